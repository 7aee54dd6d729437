//! Fakes shared by the screen tests.

use std::sync::Arc;

use crate::auth::{AuthUser, MemoryAuthProvider};
use crate::config::ClinicConfig;
use crate::context::AppContext;
use crate::db::{Document, DocumentStore, Fields, MemoryStore, Query, StoreError};
use crate::files::{FilePicker, NoFilePicker};

pub fn test_config() -> ClinicConfig {
    ClinicConfig {
        password_iterations: 10,
        ..ClinicConfig::default()
    }
}

/// Signed-out context over a fresh memory store.
pub fn memory_context() -> AppContext {
    AppContext::in_memory(test_config())
}

/// Context with `uid` already signed in.
pub fn signed_in_context(uid: &str) -> AppContext {
    signed_in_with(uid, Arc::new(MemoryStore::new()), Arc::new(NoFilePicker))
}

pub fn signed_in_with(
    uid: &str,
    store: Arc<dyn DocumentStore>,
    files: Arc<dyn FilePicker>,
) -> AppContext {
    let user = AuthUser {
        uid: uid.into(),
        email: format!("{uid}@clinic.test"),
    };
    AppContext::new(
        store,
        Arc::new(MemoryAuthProvider::signed_in(user)),
        files,
        test_config(),
    )
}

/// Store whose every call fails with a backend message.
pub struct FailingStore;

impl FailingStore {
    fn fail<T>() -> Result<T, StoreError> {
        Err(StoreError::Unavailable("network unreachable".into()))
    }
}

impl DocumentStore for FailingStore {
    fn add(&self, _collection: &str, _fields: Fields) -> Result<String, StoreError> {
        Self::fail()
    }

    fn set(&self, _collection: &str, _id: &str, _fields: Fields) -> Result<(), StoreError> {
        Self::fail()
    }

    fn get(&self, _collection: &str, _id: &str) -> Result<Option<Document>, StoreError> {
        Self::fail()
    }

    fn update(&self, _collection: &str, _id: &str, _fields: Fields) -> Result<(), StoreError> {
        Self::fail()
    }

    fn query(&self, _query: &Query) -> Result<Vec<Document>, StoreError> {
        Self::fail()
    }
}
