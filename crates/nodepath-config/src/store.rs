//! ConfigStore — the single, swappable configuration cell.
//!
//! Readers call [`ConfigStore::current`] and work against the returned
//! snapshot; a concurrent [`ConfigStore::replace`] never changes a snapshot
//! a reader already holds. Parsing happens before the swap, so a malformed
//! document leaves the current snapshot in place.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info};

use crate::error::ConfigResult;
use crate::types::Configuration;

/// Holds the current [`Configuration`] snapshot.
pub struct ConfigStore {
    current: ArcSwap<Configuration>,
}

impl ConfigStore {
    /// Create a store holding an empty configuration.
    pub fn new() -> Self {
        Self::with_config(Configuration::default())
    }

    pub fn with_config(config: Configuration) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
        }
    }

    /// Parse `raw` and swap it in. On error the held snapshot is unchanged.
    pub fn replace(&self, raw: &[u8]) -> ConfigResult<()> {
        let config = Configuration::from_json(raw)?;
        self.replace_with(config);
        Ok(())
    }

    /// Swap in an already-parsed snapshot. Last write wins.
    pub fn replace_with(&self, config: Configuration) {
        let entries = config.node_path_map.len();
        let has_default = config.has_default_path();
        let next = Arc::new(config);
        let previous = self.current.swap(Arc::clone(&next));
        if *previous != *next {
            info!(entries, has_default, "node path configuration changed");
        } else {
            debug!(entries, has_default, "node path configuration unchanged");
        }
    }

    /// The snapshot held right now.
    pub fn current(&self) -> Arc<Configuration> {
        self.current.load_full()
    }

    pub fn has_default_path(&self) -> bool {
        self.current.load().has_default_path()
    }

    pub fn is_node_allowed(&self, node: &str) -> bool {
        let allowed = self.current.load().is_node_allowed(node);
        debug!(node, allowed, "checked node against path configuration");
        allowed
    }

    /// Owned copy of the paths declared for `node`, if listed.
    pub fn paths_for(&self, node: &str) -> Option<Vec<String>> {
        self.current.load().paths_for(node).map(<[String]>::to_vec)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("current", &*self.current.load())
            .finish()
    }
}
