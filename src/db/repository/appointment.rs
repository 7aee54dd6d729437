use serde_json::json;

use super::decode_all;
use crate::db::{to_fields, Direction, DocumentStore, Fields, Query, StoreError};
use crate::models::*;

pub const APPOINTMENTS: &str = "appointment_requests";

pub fn insert_appointment(
    store: &dyn DocumentStore,
    request: &AppointmentRequest,
) -> Result<String, StoreError> {
    let id = store.add(APPOINTMENTS, to_fields(request)?)?;
    tracing::info!(%id, patient = %request.patient_id, "Appointment request created");
    Ok(id)
}

pub fn get_appointment(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<AppointmentRequest>, StoreError> {
    store
        .get(APPOINTMENTS, id)?
        .map(|doc| doc.decode())
        .transpose()
}

/// Admin list: every active filter applies, ordered by date.
pub fn list_appointments(
    store: &dyn DocumentStore,
    filter: &AppointmentFilter,
) -> Result<Vec<Stored<AppointmentRequest>>, StoreError> {
    let mut query = Query::collection(APPOINTMENTS).order_by("date", Direction::Ascending);

    if let Some(prefix) = filter.patient_prefix.as_deref().filter(|p| !p.is_empty()) {
        query = query.where_prefix("patientId", prefix);
    }
    if let Some(date) = filter.date {
        query = query.where_eq("date", date.to_string());
    }
    if let Some(status) = filter.status {
        query = query.where_eq("status", status.as_str());
    }

    Ok(decode_all(APPOINTMENTS, store.query(&query)?))
}

/// A specialist's appointments for one day, ordered by time.
pub fn list_for_specialist(
    store: &dyn DocumentStore,
    filter: &ScheduleFilter,
) -> Result<Vec<Stored<AppointmentRequest>>, StoreError> {
    let mut query = Query::collection(APPOINTMENTS)
        .where_eq("doctor", filter.doctor.as_str())
        .where_eq("date", filter.date.to_string())
        .order_by("time", Direction::Ascending);

    if let Some(prefix) = filter.patient_prefix.as_deref().filter(|p| !p.is_empty()) {
        query = query.where_prefix("patientId", prefix);
    }

    Ok(decode_all(APPOINTMENTS, store.query(&query)?))
}

/// All of one patient's requests, ordered by date.
pub fn list_for_patient(
    store: &dyn DocumentStore,
    patient_id: &str,
) -> Result<Vec<Stored<AppointmentRequest>>, StoreError> {
    let query = Query::collection(APPOINTMENTS)
        .where_eq("patientId", patient_id)
        .order_by("date", Direction::Ascending);
    Ok(decode_all(APPOINTMENTS, store.query(&query)?))
}

pub fn update_appointment_status(
    store: &dyn DocumentStore,
    id: &str,
    status: AppointmentStatus,
) -> Result<(), StoreError> {
    let mut fields = Fields::new();
    fields.insert("status".into(), json!(status.as_str()));
    store.update(APPOINTMENTS, id, fields)
}

/// Sets doctor and Accepted in a single write.
pub fn assign_specialist(
    store: &dyn DocumentStore,
    id: &str,
    doctor: &str,
) -> Result<(), StoreError> {
    let mut fields = Fields::new();
    fields.insert("doctor".into(), json!(doctor));
    fields.insert("status".into(), json!(AppointmentStatus::Accepted.as_str()));
    store.update(APPOINTMENTS, id, fields)
}
