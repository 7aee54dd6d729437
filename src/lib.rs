pub mod appointment; // Admin appointment control
pub mod attendance; // Attendance dashboard
pub mod auth;
pub mod booking; // Patient booking form
pub mod config;
pub mod context; // Shared collaborators, passed explicitly
pub mod db;
pub mod files;
pub mod home; // Role home dashboards
pub mod load; // Sequenced list loads
pub mod messaging;
pub mod models;
pub mod registration;
pub mod router; // Routes + role dispatch
pub mod schedule; // Specialist day view
pub mod session; // Login gate

#[cfg(test)]
mod testing;

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::auth::MemoryAuthProvider;
use crate::config::{ClinicConfig, ConfigError};
use crate::context::AppContext;
use crate::db::{SqliteStore, StoreError};
use crate::files::NoFilePicker;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("No home directory to place application data in")]
    NoDataDir,
    #[error("Failed to create data directory: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Install the global subscriber. `RUST_LOG` wins over the default filter.
/// Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Build a context over the on-device database and clinic catalog in
/// `data_dir`, creating the directory if needed.
pub fn open_local(data_dir: &Path) -> Result<AppContext, StartupError> {
    std::fs::create_dir_all(data_dir)?;

    let clinic = ClinicConfig::load(&data_dir.join(config::CLINIC_CONFIG_FILE))?;
    let store = SqliteStore::open(&data_dir.join(config::DATABASE_FILE))?;
    let auth = MemoryAuthProvider::new(clinic.password_iterations);

    tracing::info!(dir = %data_dir.display(), clinic = %clinic.clinic_name, "Local store opened");
    Ok(AppContext::new(
        Arc::new(store),
        Arc::new(auth),
        Arc::new(NoFilePicker),
        clinic,
    ))
}

/// Entry point for hosts: logging, then the default data directory.
pub fn run() -> Result<AppContext, StartupError> {
    init_tracing();
    tracing::info!("HealthBridge starting v{}", config::APP_VERSION);

    let data_dir = config::app_data_dir().ok_or(StartupError::NoDataDir)?;
    open_local(&data_dir)
}
