use serde_json::json;

use super::decode_all;
use crate::db::{to_fields, DocumentStore, Fields, Query, StoreError};
use crate::models::*;

pub const ATTENDANCE: &str = "attendance";

/// Seed an attendance row. The clinic screens only read and mark rows;
/// creation belongs to whatever schedules the day.
pub fn insert_attendance(
    store: &dyn DocumentStore,
    record: &AttendanceRecord,
) -> Result<String, StoreError> {
    store.add(ATTENDANCE, to_fields(record)?)
}

pub fn get_attendance(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<AttendanceRecord>, StoreError> {
    store.get(ATTENDANCE, id)?.map(|doc| doc.decode()).transpose()
}

pub fn list_attendance(
    store: &dyn DocumentStore,
    filter: &AttendanceFilter,
) -> Result<Vec<Stored<AttendanceRecord>>, StoreError> {
    let mut query = Query::collection(ATTENDANCE).where_eq("date", filter.date.to_string());

    if let Some(department) = &filter.department {
        query = query.where_eq("department", department.as_str());
    }
    if let Some(status) = filter.status {
        query = query.where_eq("status", status.as_str());
    }
    if let Some(prefix) = filter.patient_prefix.as_deref().filter(|p| !p.is_empty()) {
        query = query.where_prefix("patientId", prefix);
    }

    Ok(decode_all(ATTENDANCE, store.query(&query)?))
}

pub fn set_attendance_status(
    store: &dyn DocumentStore,
    id: &str,
    status: AttendanceStatus,
) -> Result<(), StoreError> {
    let mut fields = Fields::new();
    fields.insert("status".into(), json!(status.as_str()));
    store.update(ATTENDANCE, id, fields)
}
