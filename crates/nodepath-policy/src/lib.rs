//! nodepath-policy — path-based node eligibility and scoring.
//!
//! [`PathPolicy`] plugs into a host scheduler at four extension points.
//! It does not queue, bin-pack, or bind; the host does all of that and
//! calls in here once per workload unit:
//!
//! ```text
//! host scheduling attempt for one pod
//!   ├── pre_filter   refresh config, reject early if no node can match
//!   ├── filter       per node: is it listed (or is a default path set)?
//!   ├── score        per node: 50 + 10 per declared path
//!   └── reserve / unreserve   no-ops
//! ```
//!
//! # Components
//!
//! - **`framework`** — Extension-point traits and host-owned input types
//! - **`args`** — Plugin arguments decoded from the host's JSON
//! - **`policy`** — The policy itself and its refresh timing
//! - **`score`** — The path-count score formula

pub mod args;
pub mod error;
pub mod framework;
pub mod policy;
pub mod score;

pub use args::{ConfigSource, PolicyArgs, StorageConfig};
pub use error::{PolicyError, PolicyResult};
pub use framework::{
    Decision, FilterPlugin, FrameworkHandle, LookupError, Node, NodeInfo, NodeLister, NodeScore,
    NodeSnapshot, Plugin, Pod, PreFilterPlugin, ReservePlugin, ScoreExtensions, ScorePlugin,
    StaticHandle,
};
pub use policy::{PLUGIN_NAME, PathPolicy};
pub use score::{BASE_SCORE, PER_PATH_BONUS, path_score};
