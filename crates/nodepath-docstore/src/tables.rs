//! redb table definitions for the document store.

use redb::TableDefinition;

/// Documents keyed by `{namespace}/{name}`, JSON-serialized.
pub const DOCUMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");
