use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;

/// A patient's appointment request, as stored in `appointment_requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub patient_id: String,
    pub department: String,
    pub doctor: String,
    pub reason: String,
    pub date: NaiveDate,
    pub time: String,
    pub mode: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    /// Opaque reference to an attached report from the file picker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_uri: Option<String>,
}
