//! Document store seam.
//!
//! Every screen talks to the clinic database through [`DocumentStore`]:
//! collection-addressed documents, structured filter predicates, ordering.
//! Two backends share one query evaluator ([`Query::apply`]) so they are
//! observably identical: [`MemoryStore`] for tests and previews, and
//! [`SqliteStore`] for an on-device database.

pub mod memory;
pub mod query;
pub mod repository;
pub mod sqlite;

pub use memory::MemoryStore;
pub use query::{Direction, OrderBy, Predicate, Query};
pub use sqlite::SqliteStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Field map of a single document.
pub type Fields = Map<String, Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record did not serialize to a JSON object")]
    NotAnObject,

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A stored document: server-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Fields) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// String value of `field`, if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Deserialize the document body into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }
}

/// Collection-based CRUD with structured queries.
///
/// Writes are unconditional: `set` overwrites, `update` merges the given
/// fields into an existing document. There is no delete.
pub trait DocumentStore: Send + Sync {
    /// Create a document with a store-assigned id and return the id.
    fn add(&self, collection: &str, data: Fields) -> Result<String, StoreError>;

    /// Create or overwrite the document at `collection/id`.
    fn set(&self, collection: &str, id: &str, data: Fields) -> Result<(), StoreError>;

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Merge `fields` into an existing document. `NotFound` when absent.
    fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError>;
}

/// Serialize a typed record into a document field map.
pub fn to_fields<T: Serialize>(record: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

/// Fresh store-assigned document id (32 hex chars).
pub fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn to_fields_rejects_non_objects() {
        assert!(matches!(to_fields(&42), Err(StoreError::NotAnObject)));
    }

    #[test]
    fn decode_reads_typed_record() {
        let fields = to_fields(&Sample { name: "a".into(), count: 3 }).unwrap();
        let doc = Document::new("x", fields);
        assert_eq!(doc.get_str("name"), Some("a"));
        assert_eq!(doc.decode::<Sample>().unwrap(), Sample { name: "a".into(), count: 3 });
    }

    #[test]
    fn decode_fails_on_shape_mismatch() {
        let mut data = Fields::new();
        data.insert("name".into(), json!(7));
        let doc = Document::new("x", data);
        assert!(matches!(doc.decode::<Sample>(), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn document_ids_are_unique() {
        assert_ne!(new_document_id(), new_document_id());
        assert_eq!(new_document_id().len(), 32);
    }
}
