//! PathPolicy — path-based eligibility and scoring.
//!
//! The policy owns its [`ConfigStore`] and refreshes it from the document
//! store at the start of every pod's pre-filter. A failed refresh is
//! logged and the previous snapshot stays in force; only the load at
//! construction time is fatal.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use nodepath_config::{ConfigError, ConfigResult, ConfigStore};
use nodepath_docstore::DocumentStore;
use tracing::{debug, error, trace};

use crate::args::{ConfigSource, PolicyArgs};
use crate::error::PolicyResult;
use crate::framework::{
    Decision, FilterPlugin, FrameworkHandle, NodeInfo, NodeLister, Plugin, Pod, PreFilterPlugin,
    ReservePlugin, ScorePlugin,
};
use crate::score::path_score;

/// Name the plugin registers under with the host.
pub const PLUGIN_NAME: &str = "NodePathScheduling";

pub(crate) const NO_NODES: &str = "no nodes available to schedule";
pub(crate) const NO_MATCHING_NODES: &str = "no nodes match the path configuration";
pub(crate) const NODE_NOT_ALLOWED: &str = "node is not in the allowed nodes list";

/// Node eligibility and scoring driven by a node → paths document.
pub struct PathPolicy {
    config: ConfigStore,
    source: ConfigSource,
    documents: Arc<dyn DocumentStore>,
    nodes: Arc<dyn NodeLister>,
    refresh_interval: Option<Duration>,
    max_score: Option<i64>,
    /// Completion time of the last successful refresh.
    last_refresh: Mutex<Option<Instant>>,
}

impl PathPolicy {
    /// Build the policy and perform the initial configuration load.
    ///
    /// Fails if that load fails; there is no degraded, unconfigured policy.
    pub fn new(args: PolicyArgs, handle: &dyn FrameworkHandle) -> PolicyResult<Self> {
        let source = args.source();
        debug!(
            namespace = %source.namespace,
            name = %source.name,
            key = %source.key,
            "creating path policy"
        );

        let policy = Self {
            config: ConfigStore::new(),
            source,
            documents: handle.documents(),
            nodes: handle.nodes(),
            refresh_interval: args.refresh_interval(),
            max_score: args.max_score,
            last_refresh: Mutex::new(None),
        };

        policy.refresh_config()?;
        Ok(policy)
    }

    /// Decode raw host arguments, then build the policy.
    pub fn from_host_args(
        raw: Option<&serde_json::Value>,
        handle: &dyn FrameworkHandle,
    ) -> PolicyResult<Self> {
        let args = PolicyArgs::decode(raw)?;
        Self::new(args, handle)
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Fetch the configuration document and swap it in.
    ///
    /// The fetch runs outside the store's swap; on any error the current
    /// snapshot is kept.
    pub fn refresh_config(&self) -> ConfigResult<()> {
        let ConfigSource {
            namespace,
            name,
            key,
        } = &self.source;

        let document = self
            .documents
            .get_document(namespace, name)
            .map_err(|e| ConfigError::Fetch(format!("{namespace}/{name}: {e}")))?
            .ok_or_else(|| ConfigError::MissingDocument {
                namespace: namespace.clone(),
                name: name.clone(),
            })?;

        let raw = document.field(key).ok_or_else(|| ConfigError::MissingKey {
            namespace: namespace.clone(),
            name: name.clone(),
            key: key.clone(),
        })?;

        self.config.replace(raw.as_bytes())?;
        *self.last_refresh.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());

        debug!(%namespace, configmap = %name, %key, "loaded configuration from document store");
        Ok(())
    }

    /// Refresh unless a successful refresh happened within the interval.
    fn refresh_if_stale(&self) -> ConfigResult<()> {
        if let Some(interval) = self.refresh_interval {
            let last = *self.last_refresh.lock().unwrap_or_else(PoisonError::into_inner);
            if last.is_some_and(|at| at.elapsed() < interval) {
                trace!(?interval, "configuration still fresh, skipping refresh");
                return Ok(());
            }
        }
        self.refresh_config()
    }
}

impl std::fmt::Debug for PathPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathPolicy")
            .field("source", &self.source)
            .field("config", &self.config)
            .field("refresh_interval", &self.refresh_interval)
            .field("max_score", &self.max_score)
            .finish_non_exhaustive()
    }
}

impl Plugin for PathPolicy {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }
}

impl PreFilterPlugin for PathPolicy {
    fn pre_filter(&self, pod: &Pod) -> Decision {
        debug!(%pod, "running pre-filter");

        if let Err(e) = self.refresh_if_stale() {
            // Stale configuration beats blocking the scheduler.
            error!(error = %e, %pod, "failed to reload config in pre-filter");
        }

        let nodes = match self.nodes.list() {
            Ok(nodes) => nodes,
            Err(e) => return Decision::error(format!("error listing nodes: {e}")),
        };

        if nodes.is_empty() {
            return Decision::unschedulable(NO_NODES);
        }

        let snapshot = self.config.current();
        if snapshot.has_default_path() {
            return Decision::Success;
        }

        let any_allowed = nodes
            .iter()
            .filter_map(NodeInfo::name)
            .any(|name| snapshot.is_node_allowed(name));

        if !any_allowed {
            debug!(%pod, candidates = nodes.len(), "no candidate node matches the path configuration");
            return Decision::unschedulable(NO_MATCHING_NODES);
        }

        Decision::Success
    }
}

impl FilterPlugin for PathPolicy {
    fn filter(&self, pod: &Pod, node: &NodeInfo) -> Decision {
        let Some(name) = node.name() else {
            return Decision::error("node not found");
        };
        debug!(%pod, node = name, "running filter");

        if !self.config.is_node_allowed(name) {
            return Decision::unschedulable(NODE_NOT_ALLOWED);
        }

        Decision::Success
    }
}

impl ScorePlugin for PathPolicy {
    fn score(&self, pod: &Pod, node_name: &str) -> (i64, Decision) {
        if let Err(e) = self.nodes.get(node_name) {
            return (
                0,
                Decision::error(format!("getting node {node_name:?} from snapshot: {e}")),
            );
        }

        let snapshot = self.config.current();
        let score = path_score(snapshot.paths_for(node_name), self.max_score);

        trace!(%pod, node = node_name, score, "calculated score");
        (score, Decision::Success)
    }
}

impl ReservePlugin for PathPolicy {
    fn reserve(&self, pod: &Pod, node_name: &str) -> Decision {
        debug!(%pod, node = node_name, "running reserve");
        Decision::Success
    }

    fn unreserve(&self, pod: &Pod, node_name: &str) {
        debug!(%pod, node = node_name, "running unreserve");
    }
}
