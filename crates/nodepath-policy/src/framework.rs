//! Host scheduler contracts.
//!
//! The host owns pods, nodes, and the node snapshot; the policy only reads
//! them. Each extension point is its own trait so a host adapter can wire
//! exactly the capabilities it uses.

use std::fmt;
use std::sync::Arc;

use nodepath_docstore::DocumentStore;
use thiserror::Error;

// ── Inputs ─────────────────────────────────────────────────────────

/// The workload unit being placed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pod {
    pub namespace: String,
    pub name: String,
}

impl Pod {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Pod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A candidate compute node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Snapshot entry for one node. `node` is `None` when the host could not
/// materialize the node object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub node: Option<Node>,
}

impl NodeInfo {
    pub fn new(node: Node) -> Self {
        Self { node: Some(node) }
    }

    pub fn missing() -> Self {
        Self { node: None }
    }

    pub fn name(&self) -> Option<&str> {
        self.node.as_ref().map(|n| n.name.as_str())
    }
}

/// Failures reading the host's node snapshot.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("node {0} not found")]
    NotFound(String),

    #[error("node snapshot unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the host's node snapshot for the current cycle.
pub trait NodeLister: Send + Sync {
    fn list(&self) -> Result<Vec<NodeInfo>, LookupError>;
    fn get(&self, name: &str) -> Result<NodeInfo, LookupError>;
}

/// In-memory node snapshot.
#[derive(Debug, Clone, Default)]
pub struct NodeSnapshot {
    nodes: Vec<NodeInfo>,
}

impl NodeSnapshot {
    pub fn new(nodes: Vec<NodeInfo>) -> Self {
        Self { nodes }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|n| NodeInfo::new(Node::new(n)))
                .collect(),
        )
    }
}

impl NodeLister for NodeSnapshot {
    fn list(&self) -> Result<Vec<NodeInfo>, LookupError> {
        Ok(self.nodes.clone())
    }

    fn get(&self, name: &str) -> Result<NodeInfo, LookupError> {
        self.nodes
            .iter()
            .find(|info| info.name() == Some(name))
            .cloned()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}

/// What the host hands a plugin at construction time.
pub trait FrameworkHandle {
    /// Client for the cluster document store.
    fn documents(&self) -> Arc<dyn DocumentStore>;
    /// Node snapshot shared across the scheduling cycle.
    fn nodes(&self) -> Arc<dyn NodeLister>;
}

/// A [`FrameworkHandle`] over fixed collaborators.
#[derive(Clone)]
pub struct StaticHandle {
    pub documents: Arc<dyn DocumentStore>,
    pub nodes: Arc<dyn NodeLister>,
}

impl FrameworkHandle for StaticHandle {
    fn documents(&self) -> Arc<dyn DocumentStore> {
        self.documents.clone()
    }

    fn nodes(&self) -> Arc<dyn NodeLister> {
        self.nodes.clone()
    }
}

// ── Outcomes ───────────────────────────────────────────────────────

/// Outcome of an extension point for one pod (and node, where relevant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Success,
    /// Expected rejection: no eligible placement for this reason.
    Unschedulable(String),
    /// Something went wrong evaluating the pod or node.
    Error(String),
}

impl Decision {
    pub fn unschedulable(reason: impl Into<String>) -> Self {
        Decision::Unschedulable(reason.into())
    }

    pub fn error(cause: impl Into<String>) -> Self {
        Decision::Error(cause.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Decision::Success)
    }

    /// Reason or cause text; `None` on success.
    pub fn message(&self) -> Option<&str> {
        match self {
            Decision::Success => None,
            Decision::Unschedulable(msg) | Decision::Error(msg) => Some(msg),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Success => f.write_str("success"),
            Decision::Unschedulable(reason) => write!(f, "unschedulable: {reason}"),
            Decision::Error(cause) => write!(f, "error: {cause}"),
        }
    }
}

/// A node's score within one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeScore {
    pub name: String,
    pub score: i64,
}

// ── Extension points ───────────────────────────────────────────────

pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;
}

/// Runs once per pod before any per-node check.
pub trait PreFilterPlugin: Plugin {
    fn pre_filter(&self, pod: &Pod) -> Decision;
}

/// Runs once per candidate node.
pub trait FilterPlugin: Plugin {
    fn filter(&self, pod: &Pod, node: &NodeInfo) -> Decision;
}

/// Ranks nodes that passed every filter. Higher is better.
pub trait ScorePlugin: Plugin {
    fn score(&self, pod: &Pod, node_name: &str) -> (i64, Decision);

    /// Optional normalization pass over all scores of a cycle.
    fn score_extensions(&self) -> Option<&dyn ScoreExtensions> {
        None
    }
}

pub trait ScoreExtensions {
    fn normalize_score(&self, pod: &Pod, scores: &mut [NodeScore]) -> Decision;
}

/// Notified when the host reserves (or releases) a node for a pod.
pub trait ReservePlugin: Plugin {
    fn reserve(&self, pod: &Pod, node_name: &str) -> Decision;
    fn unreserve(&self, pod: &Pod, node_name: &str);
}
