//! Attendance dashboard for the admin.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::context::AppContext;
use crate::db::repository;
use crate::db::{DocumentStore, StoreError};
use crate::load::{spawn_load, LoadSlot, LoadState};
use crate::models::{
    options_with_all, parse_option, search_prefix, AttendanceFilter, AttendanceRecord,
    AttendanceStatus, Stored, ALL_OPTION,
};

pub const EMPTY_ATTENDANCE_MESSAGE: &str = "No attendance records found.";

/// Statuses offered as marking actions from `status`.
pub fn available_marks(status: AttendanceStatus) -> &'static [AttendanceStatus] {
    match status {
        AttendanceStatus::NotMarked => &[AttendanceStatus::Present, AttendanceStatus::Absent],
        AttendanceStatus::Present => &[AttendanceStatus::Absent],
        AttendanceStatus::Absent => &[AttendanceStatus::Present],
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    #[error("Error updating attendance: {0}")]
    Update(#[from] StoreError),
}

/// Overwrite the status of attendance row `id`.
pub fn mark(
    store: &dyn DocumentStore,
    id: &str,
    status: AttendanceStatus,
) -> Result<(), AttendanceError> {
    repository::set_attendance_status(store, id, status).map_err(|e| {
        tracing::error!(%id, error = %e, "Attendance update failed");
        AttendanceError::Update(e)
    })?;
    tracing::info!(%id, %status, "Attendance updated");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub marked: usize,
    pub total: usize,
}

impl AttendanceSummary {
    pub fn from_records(records: &[Stored<AttendanceRecord>]) -> Self {
        Self {
            marked: records.iter().filter(|r| r.record.status.is_marked()).count(),
            total: records.len(),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Attendance marked for {} out of {} patients today.",
            self.marked, self.total
        )
    }
}

pub struct AttendanceDashboard {
    ctx: AppContext,
    filter: AttendanceFilter,
    slot: Arc<LoadSlot<Stored<AttendanceRecord>>>,
}

impl AttendanceDashboard {
    pub fn new(ctx: AppContext) -> Self {
        Self::for_date(ctx, Local::now().date_naive())
    }

    pub fn for_date(ctx: AppContext, date: NaiveDate) -> Self {
        Self {
            ctx,
            filter: AttendanceFilter::for_date(date),
            slot: Arc::new(LoadSlot::new()),
        }
    }

    pub fn department_options(&self) -> Vec<String> {
        options_with_all(self.ctx.config.attendance_departments.iter().map(String::as_str))
    }

    pub fn status_options() -> Vec<String> {
        options_with_all(
            [
                AttendanceStatus::Present,
                AttendanceStatus::Absent,
                AttendanceStatus::NotMarked,
            ]
            .iter()
            .map(|s| s.as_str()),
        )
    }

    pub fn filter(&self) -> &AttendanceFilter {
        &self.filter
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.filter.date = date;
    }

    pub fn select_department(&mut self, label: &str) {
        self.filter.department = (label != ALL_OPTION && !label.is_empty()).then(|| label.to_string());
    }

    pub fn select_status(&mut self, label: &str) -> Result<(), StoreError> {
        self.filter.status = parse_option(label)?;
        Ok(())
    }

    pub fn set_search(&mut self, text: &str) {
        self.filter.patient_prefix = search_prefix(text);
    }

    pub async fn reload(&self) -> bool {
        let store = Arc::clone(&self.ctx.store);
        let filter = self.filter.clone();
        spawn_load(Arc::clone(&self.slot), move || {
            repository::list_attendance(store.as_ref(), &filter).map_err(|e| e.to_string())
        })
        .await
    }

    pub fn records(&self) -> Vec<Stored<AttendanceRecord>> {
        self.slot.items()
    }

    pub fn state(&self) -> LoadState<Stored<AttendanceRecord>> {
        self.slot.snapshot()
    }

    /// Mark a row and refresh the list.
    pub async fn mark(&self, id: &str, status: AttendanceStatus) -> Result<(), AttendanceError> {
        mark(self.ctx.store.as_ref(), id, status)?;
        self.reload().await;
        Ok(())
    }

    pub fn summary(&self) -> AttendanceSummary {
        AttendanceSummary::from_records(&self.slot.items())
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        let state = self.slot.snapshot();
        (state.applied_seq > 0 && state.items.is_empty()).then_some(EMPTY_ATTENDANCE_MESSAGE)
    }
}
