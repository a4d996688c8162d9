//! nodepath-config — the node-path configuration model and its store.
//!
//! A [`Configuration`] maps node names to the storage paths each node
//! supports. One entry may carry the [`DEFAULT_NODE_PATH`] sentinel, which
//! makes every unlisted node eligible as well.
//!
//! [`ConfigStore`] holds exactly one snapshot at a time. Readers get an
//! `Arc<Configuration>` that stays valid for as long as they hold it;
//! [`ConfigStore::replace`] parses a new document and swaps it in whole.
//!
//! ```text
//! ConfigStore
//!   └── ArcSwap<Configuration>   (readers: load, writer: store)
//!         └── Configuration
//!               └── Vec<NodePathEntry { node, paths }>
//! ```

pub mod error;
pub mod store;
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use store::ConfigStore;
pub use types::{Configuration, DEFAULT_NODE_PATH, NodePathEntry};
