use std::path::Path;

use anyhow::Context;
use clap::Args;
use nodepath_config::{ConfigError, Configuration};
use nodepath_docstore::DocumentStore;
use nodepath_policy::args::{
    DEFAULT_CONFIG_KEY, DEFAULT_CONFIG_MAP_NAME, DEFAULT_CONFIG_MAP_NAMESPACE,
};
use tracing::info;

use super::open_store;

/// Which document field holds the configuration.
#[derive(Args, Debug, Clone)]
pub struct Location {
    /// Document namespace
    #[arg(long, default_value = DEFAULT_CONFIG_MAP_NAMESPACE)]
    pub namespace: String,
    /// Document name
    #[arg(long, default_value = DEFAULT_CONFIG_MAP_NAME)]
    pub name: String,
    /// Field key within the document
    #[arg(long, default_value = DEFAULT_CONFIG_KEY)]
    pub key: String,
}

pub fn put(db: &Path, file: &Path, location: &Location) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let config = Configuration::from_json(raw.as_bytes()).map_err(ConfigError::from)?;

    let store = open_store(db)?;
    store.put_field(&location.namespace, &location.name, &location.key, &raw)?;

    info!(
        namespace = %location.namespace,
        name = %location.name,
        key = %location.key,
        entries = config.node_path_map.len(),
        "configuration stored"
    );
    println!(
        "✓ Stored {} entries in {}/{}[{}]",
        config.node_path_map.len(),
        location.namespace,
        location.name,
        location.key
    );
    Ok(())
}

pub fn show(db: &Path, location: &Location, format: &str) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let config = fetch(&store, location)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&config)?),
        _ => print!("{}", format_config(&config)),
    }
    Ok(())
}

/// Read and parse the configuration at `location`.
pub fn fetch(store: &dyn DocumentStore, location: &Location) -> anyhow::Result<Configuration> {
    let doc = store
        .get_document(&location.namespace, &location.name)?
        .ok_or_else(|| ConfigError::MissingDocument {
            namespace: location.namespace.clone(),
            name: location.name.clone(),
        })?;
    let raw = doc.field(&location.key).ok_or_else(|| ConfigError::MissingKey {
        namespace: location.namespace.clone(),
        name: location.name.clone(),
        key: location.key.clone(),
    })?;
    Ok(Configuration::from_json(raw.as_bytes()).map_err(ConfigError::from)?)
}

/// Human-readable listing, one node per line.
pub fn format_config(config: &Configuration) -> String {
    let mut out = String::new();
    if config.is_empty() {
        out.push_str("(no nodes configured; every node is rejected)\n");
        return out;
    }
    for entry in &config.node_path_map {
        let node = if entry.is_default() {
            "* (default for unlisted nodes)"
        } else {
            entry.node.as_str()
        };
        let paths = if entry.paths.is_empty() {
            "-".to_string()
        } else {
            entry.paths.join(", ")
        };
        out.push_str(&format!("{node}\t{paths}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodepath_config::{DEFAULT_NODE_PATH, NodePathEntry};

    fn location() -> Location {
        Location {
            namespace: DEFAULT_CONFIG_MAP_NAMESPACE.to_string(),
            name: DEFAULT_CONFIG_MAP_NAME.to_string(),
            key: DEFAULT_CONFIG_KEY.to_string(),
        }
    }

    #[test]
    fn put_then_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("docs.redb");
        let file = dir.path().join("config.json");
        std::fs::write(&file, r#"{"nodePathMap":[{"node":"node-a","paths":["/data1"]}]}"#)
            .unwrap();

        put(&db, &file, &location()).unwrap();

        let store = open_store(&db).unwrap();
        let config = fetch(&store, &location()).unwrap();
        assert!(config.is_node_allowed("node-a"));
    }

    #[test]
    fn put_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("docs.redb");
        let file = dir.path().join("config.json");
        std::fs::write(&file, r#"{"nodePathMap":"all"}"#).unwrap();

        assert!(put(&db, &file, &location()).is_err());
        let store = open_store(&db).unwrap();
        assert!(fetch(&store, &location()).is_err());
    }

    #[test]
    fn format_marks_default_entry() {
        let config = Configuration::new(vec![
            NodePathEntry::new("node-a", ["/data1", "/data2"]),
            NodePathEntry::new(DEFAULT_NODE_PATH, Vec::<String>::new()),
        ]);
        let text = format_config(&config);
        assert!(text.contains("node-a\t/data1, /data2"));
        assert!(text.contains("* (default for unlisted nodes)\t-"));
    }
}
