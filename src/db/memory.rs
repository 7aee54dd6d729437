use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::{new_document_id, Document, DocumentStore, Fields, Query, StoreError};

/// In-process document store.
///
/// Collections are created on first write. Reads take a snapshot of the
/// collection and run it through the shared query evaluator.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Fields>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let guard = self.collections.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(guard.get(collection).map_or(0, BTreeMap::len))
    }
}

impl DocumentStore for MemoryStore {
    fn add(&self, collection: &str, data: Fields) -> Result<String, StoreError> {
        let id = new_document_id();
        self.set(collection, &id, data)?;
        Ok(id)
    }

    fn set(&self, collection: &str, id: &str, data: Fields) -> Result<(), StoreError> {
        let mut guard = self.collections.write().map_err(|_| StoreError::LockPoisoned)?;
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let guard = self.collections.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut guard = self.collections.write().map_err(|_| StoreError::LockPoisoned)?;
        let existing = guard
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        existing.extend(fields);
        Ok(())
    }

    fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let snapshot: Vec<Document> = {
            let guard = self.collections.read().map_err(|_| StoreError::LockPoisoned)?;
            match guard.get(&query.collection) {
                Some(docs) => docs
                    .iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect(),
                None => Vec::new(),
            }
        };
        Ok(query.apply(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Direction;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn add_assigns_id_and_get_returns_it() {
        let store = MemoryStore::new();
        let id = store.add("notes", fields(json!({"text": "hi"}))).unwrap();
        let doc = store.get("notes", &id).unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.get_str("text"), Some("hi"));
        assert_eq!(store.count("notes").unwrap(), 1);
    }

    #[test]
    fn get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("notes", "nope").unwrap().is_none());
    }

    #[test]
    fn update_merges_fields() {
        let store = MemoryStore::new();
        store.set("c", "x", fields(json!({"a": 1, "b": 2}))).unwrap();
        store.update("c", "x", fields(json!({"b": 3, "c": 4}))).unwrap();
        let doc = store.get("c", "x").unwrap().unwrap();
        assert_eq!(doc.data, fields(json!({"a": 1, "b": 3, "c": 4})));
    }

    #[test]
    fn update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store.update("c", "ghost", Fields::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn set_overwrites() {
        let store = MemoryStore::new();
        store.set("c", "x", fields(json!({"a": 1}))).unwrap();
        store.set("c", "x", fields(json!({"b": 2}))).unwrap();
        let doc = store.get("c", "x").unwrap().unwrap();
        assert!(doc.get("a").is_none());
        assert_eq!(doc.get("b"), Some(&json!(2)));
    }

    #[test]
    fn query_is_scoped_to_collection() {
        let store = MemoryStore::new();
        store.set("a", "1", fields(json!({"n": 1}))).unwrap();
        store.set("b", "2", fields(json!({"n": 2}))).unwrap();
        let out = store
            .query(&Query::collection("a").order_by("n", Direction::Ascending))
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "1");
        assert!(store.query(&Query::collection("empty")).unwrap().is_empty());
    }
}
