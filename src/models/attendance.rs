use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::AttendanceStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: String,
    pub department: String,
    pub doctor: String,
    #[serde(default)]
    pub status: AttendanceStatus,
}
