//! nodepath-docstore — the document store configuration is fetched from.
//!
//! A document is a small map of field keys to text blobs, addressed by
//! `(namespace, name)`. The policy only ever reads through the
//! [`DocumentStore`] trait; [`RedbDocumentStore`] is the bundled backend,
//! persistent on disk or ephemeral in memory.
//!
//! The `RedbDocumentStore` is `Clone` + `Send` + `Sync` (backed by
//! `Arc<Database>`) and can be shared across threads and async tasks.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use store::{DocumentStore, RedbDocumentStore};
pub use types::Document;
