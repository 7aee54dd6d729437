//! Shared handles passed into every screen.
//!
//! `AppContext` carries the external collaborators explicitly instead of
//! reaching for process-wide singletons. It is cheap to clone: every field
//! is an `Arc`.

use std::sync::Arc;

use crate::auth::{AuthError, AuthProvider, AuthUser, MemoryAuthProvider};
use crate::config::ClinicConfig;
use crate::db::{DocumentStore, MemoryStore};
use crate::files::{FilePicker, NoFilePicker};

#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub files: Arc<dyn FilePicker>,
    pub config: Arc<ClinicConfig>,
}

impl AppContext {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        files: Arc<dyn FilePicker>,
        config: ClinicConfig,
    ) -> Self {
        Self {
            store,
            auth,
            files,
            config: Arc::new(config),
        }
    }

    /// Fully local context: memory store, memory auth, no file access.
    pub fn in_memory(config: ClinicConfig) -> Self {
        let auth = MemoryAuthProvider::new(config.password_iterations);
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(auth),
            Arc::new(NoFilePicker),
            config,
        )
    }

    /// The signed-in user, or `NotSignedIn`.
    pub fn require_user(&self) -> Result<AuthUser, AuthError> {
        self.auth.current_user().ok_or(AuthError::NotSignedIn)
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("signed_in", &self.auth.current_user().is_some())
            .field("clinic", &self.config.clinic_name)
            .finish()
    }
}
