//! Document type stored in and fetched from the document store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named bag of text fields, scoped to a namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub namespace: String,
    pub name: String,
    /// Field key → text blob.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl Document {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    /// Builder-style field insert.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Look up a single field.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Composite key used in the documents table.
    pub fn table_key(&self) -> String {
        document_key(&self.namespace, &self.name)
    }
}

/// `{namespace}/{name}`.
pub fn document_key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}
