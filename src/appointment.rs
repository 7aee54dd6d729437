//! Appointment lifecycle: admin actions and the admin control screen.
//!
//! States run Pending → Accepted → Completed, with Cancelled reachable from
//! anywhere. Transitions out of a terminal state are not rejected; they are
//! logged and written like any other.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::context::AppContext;
use crate::db::repository;
use crate::db::{DocumentStore, StoreError};
use crate::load::{spawn_load, LoadSlot, LoadState};
use crate::models::{
    options_with_all, parse_option, search_prefix, AppointmentFilter, AppointmentRequest,
    AppointmentStatus, Stored,
};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    Accept,
    /// Set the doctor and accept in one write.
    Assign(String),
    Cancel,
    /// Placeholder: logged, nothing is written.
    Reschedule,
}

/// Action buttons, without the Assign payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Reschedule,
    Cancel,
    Accept,
    Assign,
}

impl AdminAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Accept => ActionKind::Accept,
            Self::Assign(_) => ActionKind::Assign,
            Self::Cancel => ActionKind::Cancel,
            Self::Reschedule => ActionKind::Reschedule,
        }
    }

    /// Status written by this action, if any.
    pub fn target_status(&self) -> Option<AppointmentStatus> {
        match self {
            Self::Accept | Self::Assign(_) => Some(AppointmentStatus::Accepted),
            Self::Cancel => Some(AppointmentStatus::Cancelled),
            Self::Reschedule => None,
        }
    }
}

/// Buttons offered for an appointment in `status`.
pub fn available_actions(status: AppointmentStatus) -> Vec<ActionKind> {
    let mut actions = vec![ActionKind::Reschedule, ActionKind::Cancel];
    if status == AppointmentStatus::Pending {
        actions.push(ActionKind::Accept);
    }
    if matches!(status, AppointmentStatus::Pending | AppointmentStatus::Accepted) {
        actions.push(ActionKind::Assign);
    }
    actions
}

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Select a specialist to assign.")]
    NoSpecialist,
    #[error("Error accepting appointment: {0}")]
    Accept(#[source] StoreError),
    #[error("Error assigning specialist: {0}")]
    Assign(#[source] StoreError),
    #[error("Error cancelling appointment: {0}")]
    Cancel(#[source] StoreError),
}

/// Apply `action` to appointment `id`. Returns the status line to show.
pub fn apply_action(
    store: &dyn DocumentStore,
    id: &str,
    action: &AdminAction,
) -> Result<String, AppointmentError> {
    if let AdminAction::Assign(doctor) = action {
        if doctor.trim().is_empty() {
            return Err(AppointmentError::NoSpecialist);
        }
    }

    if let Some(target) = action.target_status() {
        warn_on_terminal(store, id, target);
    }

    match action {
        AdminAction::Reschedule => {
            tracing::info!(%id, "Reschedule requested");
            Ok(format!("Reschedule requested for appointment {id}."))
        }
        AdminAction::Cancel => {
            repository::update_appointment_status(store, id, AppointmentStatus::Cancelled)
                .map_err(|e| {
                    tracing::error!(%id, error = %e, "Cancel failed");
                    AppointmentError::Cancel(e)
                })?;
            Ok(format!("Appointment {id} cancelled."))
        }
        AdminAction::Assign(doctor) => {
            repository::assign_specialist(store, id, doctor).map_err(|e| {
                tracing::error!(%id, error = %e, "Assign failed");
                AppointmentError::Assign(e)
            })?;
            Ok(format!("Appointment {id} assigned to {doctor}"))
        }
        AdminAction::Accept => {
            repository::update_appointment_status(store, id, AppointmentStatus::Accepted)
                .map_err(|e| {
                    tracing::error!(%id, error = %e, "Accept failed");
                    AppointmentError::Accept(e)
                })?;
            Ok(format!("Appointment {id} accepted."))
        }
    }
}

/// Leaving Completed or Cancelled is allowed but worth a log line.
fn warn_on_terminal(store: &dyn DocumentStore, id: &str, target: AppointmentStatus) {
    match repository::get_appointment(store, id) {
        Ok(Some(current)) if current.status.is_terminal() && current.status != target => {
            tracing::warn!(
                %id,
                from = %current.status,
                to = %target,
                "Changing status of a closed appointment"
            );
        }
        Ok(_) => {}
        Err(e) => tracing::debug!(%id, error = %e, "Could not read current status"),
    }
}

// ---------------------------------------------------------------------------
// Admin control screen
// ---------------------------------------------------------------------------

pub struct AppointmentControlScreen {
    ctx: AppContext,
    filter: AppointmentFilter,
    slot: Arc<LoadSlot<Stored<AppointmentRequest>>>,
    status_message: Option<String>,
}

impl AppointmentControlScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            filter: AppointmentFilter::default(),
            slot: Arc::new(LoadSlot::new()),
            status_message: None,
        }
    }

    pub fn status_options() -> Vec<String> {
        options_with_all(AppointmentStatus::ALL.iter().map(|s| s.as_str()))
    }

    /// Specialists offered in the Assign dropdown.
    pub fn specialists(&self) -> &[String] {
        &self.ctx.config.assignable_specialists
    }

    pub fn filter(&self) -> &AppointmentFilter {
        &self.filter
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.filter.date = date;
    }

    /// Select a status dropdown entry; `"All"` clears the filter.
    pub fn select_status(&mut self, label: &str) -> Result<(), StoreError> {
        self.filter.status = parse_option(label)?;
        Ok(())
    }

    pub fn set_search(&mut self, text: &str) {
        self.filter.patient_prefix = search_prefix(text);
    }

    /// Re-run the query for the current filter. Returns whether this load's
    /// result was applied.
    pub async fn reload(&self) -> bool {
        let store = Arc::clone(&self.ctx.store);
        let filter = self.filter.clone();
        spawn_load(Arc::clone(&self.slot), move || {
            repository::list_appointments(store.as_ref(), &filter).map_err(|e| e.to_string())
        })
        .await
    }

    pub fn appointments(&self) -> Vec<Stored<AppointmentRequest>> {
        self.slot.items()
    }

    pub fn state(&self) -> LoadState<Stored<AppointmentRequest>> {
        self.slot.snapshot()
    }

    /// Run an action, record its status line and refresh the list.
    pub async fn perform(&mut self, id: &str, action: AdminAction) -> Result<(), AppointmentError> {
        let result = apply_action(self.ctx.store.as_ref(), id, &action);
        self.status_message = Some(match &result {
            Ok(message) => message.clone(),
            Err(e) => e.to_string(),
        });
        if result.is_ok() && action.target_status().is_some() {
            self.reload().await;
        }
        result.map(|_| ())
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
