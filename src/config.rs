use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "HealthBridge";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the on-device document database
pub const DATABASE_FILE: &str = "healthbridge.db";

/// File name of the optional clinic catalog override
pub const CLINIC_CONFIG_FILE: &str = "clinic.json";

/// Get the application data directory (~/HealthBridge/)
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

/// Path of the on-device document database
pub fn database_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(DATABASE_FILE))
}

/// Path of the clinic catalog override
pub fn clinic_config_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(CLINIC_CONFIG_FILE))
}

/// Log filter used when `RUST_LOG` is unset
pub fn default_log_filter() -> &'static str {
    "info,healthbridge_lib=debug"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Clinic catalog: the option lists the forms offer plus a few tunables.
///
/// Every field has a default, so a partial JSON file only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClinicConfig {
    pub clinic_name: String,
    pub departments: Vec<String>,
    pub doctors: Vec<String>,
    pub visit_reasons: Vec<String>,
    pub appointment_modes: Vec<String>,
    /// Specialists the admin can assign to a request.
    pub assignable_specialists: Vec<String>,
    pub attendance_departments: Vec<String>,
    pub message_recipients: Vec<String>,
    pub message_subjects: Vec<String>,
    /// Recipient whose messages appear in every inbox.
    pub admin_recipient: String,
    /// Characters of message body shown in an inbox row.
    pub preview_chars: usize,
    /// PBKDF2 rounds for locally hashed passwords.
    pub password_iterations: u32,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            clinic_name: "KIOT Health".into(),
            departments: strings(&["General Medicine", "Cardiology", "Dermatology"]),
            doctors: strings(&["Dr. Smith", "Dr. Jones", "Dr. Williams"]),
            visit_reasons: strings(&["Fever", "Headache", "Follow-up"]),
            appointment_modes: strings(&["In-person", "Video Consultation", "Phone Call"]),
            assignable_specialists: strings(&["Dr. Any", "Dr. A", "Dr. B"]),
            attendance_departments: strings(&[
                "General Medicine",
                "Neurology",
                "Dermatology",
                "Cardiology",
            ]),
            message_recipients: strings(&["Admin", "Dr. Raghav", "Dr. Other"]),
            message_subjects: strings(&["Reschedule", "Inquiry", "Others"]),
            admin_recipient: "Admin".into(),
            preview_chars: 50,
            password_iterations: 100_000,
        }
    }
}

impl ClinicConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No clinic config, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
