//! Configuration snapshot types.
//!
//! The JSON shape is fixed by the documents operators already write:
//!
//! ```json
//! { "nodePathMap": [ { "node": "node-a", "paths": ["/data1"] } ] }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Reserved node name marking "all unlisted nodes are eligible".
pub const DEFAULT_NODE_PATH: &str = "DEFAULT_PATH_FOR_NON_LISTED_NODES";

/// One node's declared storage paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodePathEntry {
    /// Node name, or [`DEFAULT_NODE_PATH`].
    pub node: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub paths: Vec<String>,
}

impl NodePathEntry {
    pub fn new<I, S>(node: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            node: node.into(),
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.node == DEFAULT_NODE_PATH
    }
}

/// An immutable node-path mapping. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Configuration {
    #[serde(rename = "nodePathMap", default, deserialize_with = "null_as_empty")]
    pub node_path_map: Vec<NodePathEntry>,
}

impl Configuration {
    pub fn new(entries: Vec<NodePathEntry>) -> Self {
        Self {
            node_path_map: entries,
        }
    }

    /// Parse a raw JSON document. A `null` document is an empty mapping.
    pub fn from_json(raw: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(serde_json::from_slice::<Option<Self>>(raw)?.unwrap_or_default())
    }

    pub fn is_empty(&self) -> bool {
        self.node_path_map.is_empty()
    }

    /// True if any entry carries the default-path sentinel.
    pub fn has_default_path(&self) -> bool {
        self.node_path_map.iter().any(NodePathEntry::is_default)
    }

    /// Whether `node` may receive workloads.
    ///
    /// A default-path entry admits every node; otherwise the node must be
    /// listed by exact, case-sensitive name.
    pub fn is_node_allowed(&self, node: &str) -> bool {
        self.has_default_path() || self.entry(node).is_some()
    }

    /// Paths explicitly declared for `node`. The default entry never
    /// supplies paths for unlisted nodes.
    pub fn paths_for(&self, node: &str) -> Option<&[String]> {
        self.entry(node).map(|e| e.paths.as_slice())
    }

    /// Explicitly listed node names, sentinel excluded.
    pub fn listed_nodes(&self) -> impl Iterator<Item = &str> {
        self.node_path_map
            .iter()
            .filter(|e| !e.is_default())
            .map(|e| e.node.as_str())
    }

    fn entry(&self, node: &str) -> Option<&NodePathEntry> {
        self.node_path_map.iter().find(|e| e.node == node)
    }
}

/// Missing and `null` lists both read as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_default() -> Configuration {
        Configuration::new(vec![
            NodePathEntry::new("node-a", ["/data1"]),
            NodePathEntry::new(DEFAULT_NODE_PATH, Vec::<String>::new()),
        ])
    }

    fn listed_only() -> Configuration {
        Configuration::new(vec![
            NodePathEntry::new("node-a", ["/data1", "/data2"]),
            NodePathEntry::new("node-b", Vec::<String>::new()),
        ])
    }

    #[test]
    fn parses_document_shape() {
        let raw = br#"{"nodePathMap":[{"node":"node-a","paths":["/data1","/data2"]}]}"#;
        let config = Configuration::from_json(raw).unwrap();

        assert_eq!(config.node_path_map.len(), 1);
        assert_eq!(config.node_path_map[0].node, "node-a");
        assert_eq!(config.node_path_map[0].paths, vec!["/data1", "/data2"]);
    }

    #[test]
    fn missing_paths_defaults_to_empty() {
        let raw = br#"{"nodePathMap":[{"node":"node-a"}]}"#;
        let config = Configuration::from_json(raw).unwrap();
        assert_eq!(config.paths_for("node-a"), Some(&[][..]));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = br#"{"nodePathMap":[],"sharedFileSystemPath":"/mnt"}"#;
        assert!(Configuration::from_json(raw).unwrap().is_empty());
    }

    #[test]
    fn missing_or_null_node_path_map_is_empty() {
        for raw in [&b"{}"[..], &br#"{"nodePathMap":null}"#[..], &b"null"[..]] {
            let config = Configuration::from_json(raw).unwrap();
            assert!(config.is_empty());
            assert!(!config.is_node_allowed("node-a"));
        }
    }

    #[test]
    fn null_paths_read_as_empty() {
        let raw = br#"{"nodePathMap":[{"node":"node-a","paths":null}]}"#;
        let config = Configuration::from_json(raw).unwrap();
        assert!(config.is_node_allowed("node-a"));
        assert_eq!(config.paths_for("node-a"), Some(&[][..]));
    }

    #[test]
    fn invalid_documents_are_rejected() {
        assert!(Configuration::from_json(b"not json").is_err());
        assert!(Configuration::from_json(br#"{"nodePathMap":{}}"#).is_err());
        assert!(Configuration::from_json(br#"{"nodePathMap":[{"paths":[]}]}"#).is_err());
    }

    #[test]
    fn default_path_allows_any_node() {
        let config = with_default();
        assert!(config.has_default_path());
        for node in ["node-a", "node-z", "", "NODE-A", "any-node"] {
            assert!(config.is_node_allowed(node), "{node} should be allowed");
        }
    }

    #[test]
    fn without_default_only_exact_names_allowed() {
        let config = listed_only();
        assert!(!config.has_default_path());
        assert!(config.is_node_allowed("node-a"));
        assert!(config.is_node_allowed("node-b"));
        assert!(!config.is_node_allowed("NODE-A"));
        assert!(!config.is_node_allowed("node-"));
        assert!(!config.is_node_allowed("node-c"));
    }

    #[test]
    fn empty_configuration_allows_nothing() {
        let config = Configuration::default();
        assert!(!config.is_node_allowed("node-a"));
        assert!(!config.has_default_path());
    }

    #[test]
    fn default_path_does_not_synthesize_paths() {
        let config = with_default();
        assert_eq!(config.paths_for("any-node"), None);
        assert_eq!(config.paths_for("node-a"), Some(&["/data1".to_string()][..]));
    }

    #[test]
    fn paths_for_returns_first_match() {
        let config = Configuration::new(vec![
            NodePathEntry::new("node-a", ["/first"]),
            NodePathEntry::new("node-a", ["/second", "/third"]),
        ]);
        assert_eq!(config.paths_for("node-a").map(<[String]>::len), Some(1));
    }

    #[test]
    fn listed_nodes_skips_sentinel() {
        let config = with_default();
        assert_eq!(config.listed_nodes().collect::<Vec<_>>(), vec!["node-a"]);
    }
}
