pub mod config;
pub mod simulate;
pub mod watch;

use std::path::Path;

use nodepath_docstore::RedbDocumentStore;
use nodepath_policy::PolicyArgs;

/// Open the document store, creating the file if needed.
pub fn open_store(db: &Path) -> anyhow::Result<RedbDocumentStore> {
    Ok(RedbDocumentStore::open(db)?)
}

/// Read plugin arguments from a JSON file, or use defaults.
pub fn load_args(path: Option<&Path>) -> anyhow::Result<PolicyArgs> {
    let raw = match path {
        Some(path) => Some(serde_json::from_str::<serde_json::Value>(
            &std::fs::read_to_string(path)?,
        )?),
        None => None,
    };
    Ok(PolicyArgs::decode(raw.as_ref())?)
}
