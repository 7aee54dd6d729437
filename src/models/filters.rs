use std::str::FromStr;

use chrono::NaiveDate;

use super::enums::{AppointmentStatus, AttendanceStatus};

/// Dropdown entry that disables a filter.
pub const ALL_OPTION: &str = "All";

/// Admin appointment list filter. `None` means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    /// Patient-id prefix search; empty is treated as absent.
    pub patient_prefix: Option<String>,
}

/// A specialist's day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleFilter {
    pub doctor: String,
    pub date: NaiveDate,
    pub patient_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub date: NaiveDate,
    pub department: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub patient_prefix: Option<String>,
}

impl AttendanceFilter {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            department: None,
            status: None,
            patient_prefix: None,
        }
    }
}

/// Normalize free-text search input: blank → `None`.
pub fn search_prefix(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Parse a dropdown selection. `"All"` disables the filter.
pub fn parse_option<T: FromStr>(label: &str) -> Result<Option<T>, T::Err> {
    if label == ALL_OPTION {
        Ok(None)
    } else {
        label.parse().map(Some)
    }
}

/// `"All"` followed by every label.
pub fn options_with_all<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    std::iter::once(ALL_OPTION)
        .chain(labels)
        .map(str::to_string)
        .collect()
}
