//! Document store contract and its redb-backed implementation.
//!
//! Documents are JSON-serialized into redb's `&[u8]` value column under a
//! `{namespace}/{name}` key. The in-memory backend exists for tests and
//! for embedding the policy without a database file.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::tables::DOCUMENTS;
use crate::types::{Document, document_key};

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// Read access to namespaced documents.
///
/// `Ok(None)` means the document does not exist; `Err` is reserved for
/// transport or storage failures.
pub trait DocumentStore: Send + Sync {
    fn get_document(&self, namespace: &str, name: &str) -> StoreResult<Option<Document>>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    fn get_document(&self, namespace: &str, name: &str) -> StoreResult<Option<Document>> {
        (**self).get_document(namespace, name)
    }
}

/// Thread-safe document store backed by redb.
#[derive(Clone)]
pub struct RedbDocumentStore {
    db: Arc<Database>,
}

impl RedbDocumentStore {
    /// Open (or create) a persistent document store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "document store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory document store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory document store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(DOCUMENTS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Insert or replace a document.
    pub fn put_document(&self, doc: &Document) -> StoreResult<()> {
        let key = doc.table_key();
        let value = serde_json::to_vec(doc).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(DOCUMENTS).map_err(map_err!(Table))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, fields = doc.data.len(), "document stored");
        Ok(())
    }

    /// Set a single field, creating the document if it does not exist.
    pub fn put_field(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
        value: &str,
    ) -> StoreResult<()> {
        let mut doc = self
            .read_document(namespace, name)?
            .unwrap_or_else(|| Document::new(namespace, name));
        doc.data.insert(key.to_string(), value.to_string());
        self.put_document(&doc)
    }

    /// List every document in a namespace.
    pub fn list_documents(&self, namespace: &str) -> StoreResult<Vec<Document>> {
        let prefix = format!("{namespace}/");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DOCUMENTS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(&prefix) {
                let doc: Document =
                    serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
                results.push(doc);
            }
        }
        Ok(results)
    }

    /// Delete a document. Returns true if it existed.
    pub fn delete_document(&self, namespace: &str, name: &str) -> StoreResult<bool> {
        let key = document_key(namespace, name);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(DOCUMENTS).map_err(map_err!(Table))?;
            existed = table.remove(key.as_str()).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, existed, "document deleted");
        Ok(existed)
    }

    fn read_document(&self, namespace: &str, name: &str) -> StoreResult<Option<Document>> {
        let key = document_key(namespace, name);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DOCUMENTS).map_err(map_err!(Table))?;
        match table.get(key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let doc: Document =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }
}

impl DocumentStore for RedbDocumentStore {
    fn get_document(&self, namespace: &str, name: &str) -> StoreResult<Option<Document>> {
        self.read_document(namespace, name)
    }
}
