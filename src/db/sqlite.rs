use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{new_document_id, Document, DocumentStore, Fields, Query, StoreError};

/// SQLite-backed document store.
///
/// Documents live in a single `documents` table keyed by
/// `(collection, id)` with the field map stored as JSON text.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and run migrations
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        tracing::info!(path = %path.display(), "Document database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

fn configure_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("PRAGMA journal_mode=DELETE;")?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/migrations/001_documents.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql)
                .map_err(|e| StoreError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

fn parse_body(collection: &str, id: &str, body: &str) -> Option<Fields> {
    match serde_json::from_str::<Fields>(body) {
        Ok(fields) => Some(fields),
        Err(e) => {
            tracing::warn!(collection, id, error = %e, "Skipping unreadable document body");
            None
        }
    }
}

impl DocumentStore for SqliteStore {
    fn add(&self, collection: &str, data: Fields) -> Result<String, StoreError> {
        let id = new_document_id();
        let body = serde_json::to_string(&data)?;
        self.lock()?.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
            params![collection, id, body],
        )?;
        Ok(id)
    }

    fn set(&self, collection: &str, id: &str, data: Fields) -> Result<(), StoreError> {
        let body = serde_json::to_string(&data)?;
        self.lock()?.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT(collection, id) DO UPDATE
             SET body = excluded.body, updated_at = datetime('now')",
            params![collection, id, body],
        )?;
        Ok(())
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let body: Option<String> = self
            .lock()?
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(body
            .and_then(|b| parse_body(collection, id, &b))
            .map(|data| Document::new(id, data)))
    }

    fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let body: Option<String> = tx
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;
        let not_found = || StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };
        let mut data: Fields = serde_json::from_str(&body.ok_or_else(not_found)?)?;
        data.extend(fields);

        tx.execute(
            "UPDATE documents SET body = ?3, updated_at = datetime('now')
             WHERE collection = ?1 AND id = ?2",
            params![collection, id, serde_json::to_string(&data)?],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(String, String)> = {
            let conn = self.lock()?;
            let mut stmt =
                conn.prepare("SELECT id, body FROM documents WHERE collection = ?1")?;
            let mapped = stmt.query_map(params![query.collection], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
            let collected = mapped.collect::<Result<Vec<_>, _>>()?;
            collected
        };

        let docs = rows.into_iter().filter_map(|(id, body)| {
            parse_body(&query.collection, &id, &body).map(|data| Document::new(id, data))
        });
        Ok(query.apply(docs))
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
    fn schema_version_is_current() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn migration_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock().unwrap();
        assert!(run_migrations(&conn).is_ok());
    }

    #[test]
    fn add_get_update_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store
            .add("appointment_requests", fields(json!({"status": "Pending", "doctor": "Dr. Smith"})))
            .unwrap();
        store
            .update("appointment_requests", &id, fields(json!({"status": "Cancelled"})))
            .unwrap();
        let doc = store.get("appointment_requests", &id).unwrap().unwrap();
        assert_eq!(doc.get_str("status"), Some("Cancelled"));
        assert_eq!(doc.get_str("doctor"), Some("Dr. Smith"));
    }

    #[test]
    fn update_missing_document_fails() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.update("c", "ghost", Fields::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn set_overwrites_existing_document() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("users", "u1", fields(json!({"role": "Patient"}))).unwrap();
        store.set("users", "u1", fields(json!({"role": "Admin"}))).unwrap();
        let doc = store.get("users", "u1").unwrap().unwrap();
        assert_eq!(doc.get_str("role"), Some("Admin"));
    }

    #[test]
    fn query_skips_corrupt_bodies() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("c", "good", fields(json!({"n": 1}))).unwrap();
        store
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO documents (collection, id, body) VALUES ('c', 'bad', 'not json')",
                [],
            )
            .unwrap();
        let out = store.query(&Query::collection("c")).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "good");
    }

    #[test]
    fn documents_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("healthbridge.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("messages", "m1", fields(json!({"timestamp": 5}))).unwrap();
            store.set("messages", "m2", fields(json!({"timestamp": 9}))).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let out = store
            .query(&Query::collection("messages").order_by("timestamp", Direction::Descending))
            .unwrap();
        let ids: Vec<_> = out.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1"]);
    }
}
