//! Patient appointment booking.

use chrono::NaiveDate;

use crate::auth::AuthError;
use crate::context::AppContext;
use crate::db::repository;
use crate::db::StoreError;
use crate::files::FileRef;
use crate::models::{AppointmentRequest, AppointmentStatus};
use crate::router::Navigator;

pub const SUBMITTED_MESSAGE: &str = "Appointment request submitted successfully.";

/// Form state. Every field starts unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub department: Option<String>,
    pub doctor: Option<String>,
    pub reason: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub report: Option<FileRef>,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Please fill all required fields.")]
    MissingFields,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Error: {0}")]
    Store(#[from] StoreError),
}

fn filled(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl BookingForm {
    /// Build the request for `patient_id`, or `MissingFields`.
    pub fn to_request(&self, patient_id: &str) -> Result<AppointmentRequest, BookingError> {
        let (Some(department), Some(doctor), Some(reason), Some(date), Some(time), Some(mode)) = (
            filled(&self.department),
            filled(&self.doctor),
            filled(&self.reason),
            self.date,
            filled(&self.time),
            filled(&self.mode),
        ) else {
            return Err(BookingError::MissingFields);
        };

        Ok(AppointmentRequest {
            patient_id: patient_id.to_string(),
            department,
            doctor,
            reason,
            date,
            time,
            mode,
            status: AppointmentStatus::Pending,
            report_uri: self.report.as_ref().map(|r| r.as_str().to_string()),
        })
    }
}

pub struct BookingScreen {
    ctx: AppContext,
    pub form: BookingForm,
    status: Option<String>,
}

impl BookingScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            form: BookingForm::default(),
            status: None,
        }
    }

    pub fn departments(&self) -> &[String] {
        &self.ctx.config.departments
    }

    pub fn doctors(&self) -> &[String] {
        &self.ctx.config.doctors
    }

    pub fn visit_reasons(&self) -> &[String] {
        &self.ctx.config.visit_reasons
    }

    pub fn modes(&self) -> &[String] {
        &self.ctx.config.appointment_modes
    }

    /// Ask the picker for a report. Backing out keeps the current one.
    pub fn attach_report(&mut self) -> Option<&FileRef> {
        if let Some(file) = self.ctx.files.pick() {
            tracing::debug!(report = file.as_str(), "Report attached");
            self.form.report = Some(file);
        }
        self.form.report.as_ref()
    }

    /// Validate, store as Pending, then pop back. Returns the new id.
    pub fn submit(&mut self, nav: &mut Navigator) -> Result<String, BookingError> {
        let result = self.try_submit();
        match &result {
            Ok(id) => {
                tracing::info!(%id, "Booking submitted");
                self.status = Some(SUBMITTED_MESSAGE.to_string());
                nav.pop_back();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Booking rejected");
                self.status = Some(e.to_string());
            }
        }
        result
    }

    fn try_submit(&self) -> Result<String, BookingError> {
        // Placeholder uid: validation runs before any auth or store call.
        let draft = self.form.to_request("")?;
        let user = self.ctx.require_user()?;
        let request = AppointmentRequest {
            patient_id: user.uid,
            ..draft
        };
        Ok(repository::insert_appointment(self.ctx.store.as_ref(), &request)?)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{repository::APPOINTMENTS, MemoryStore, Query};
    use crate::db::DocumentStore;
    use crate::files::StaticFilePicker;
    use crate::models::Role;
    use crate::router::Route;
    use crate::testing::{memory_context, signed_in_with, FailingStore};
    use std::sync::Arc;

    fn complete_form() -> BookingForm {
        BookingForm {
            department: Some("Cardiology".into()),
            doctor: Some("Dr. Smith".into()),
            reason: Some("Fever".into()),
            date: NaiveDate::from_ymd_opt(2024, 6, 10),
            time: Some("09:30".into()),
            mode: Some("In-person".into()),
            report: None,
        }
    }

    fn nav_at_booking() -> Navigator {
        let mut nav = Navigator::new();
        nav.navigate(Route::Home(Role::Patient));
        nav.navigate(Route::BookAppointment);
        nav
    }

    #[test]
    fn submitted_request_is_pending_and_retrievable() {
        let store = Arc::new(MemoryStore::new());
        let picker = StaticFilePicker::new(Some(FileRef("content://reports/42".into())));
        let ctx = signed_in_with("p1", store.clone(), Arc::new(picker));
        let mut screen = BookingScreen::new(ctx);
        screen.form = complete_form();
        assert!(screen.attach_report().is_some());

        let mut nav = nav_at_booking();
        let id = screen.submit(&mut nav).unwrap();
        assert_eq!(screen.status(), Some(SUBMITTED_MESSAGE));
        assert_eq!(nav.current(), Route::Home(Role::Patient));

        let stored = repository::get_appointment(store.as_ref(), &id).unwrap().unwrap();
        assert_eq!(stored.patient_id, "p1");
        assert_eq!(stored.department, "Cardiology");
        assert_eq!(stored.doctor, "Dr. Smith");
        assert_eq!(stored.reason, "Fever");
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(stored.time, "09:30");
        assert_eq!(stored.mode, "In-person");
        assert_eq!(stored.status, AppointmentStatus::Pending);
        assert_eq!(stored.report_uri.as_deref(), Some("content://reports/42"));
    }

    #[test]
    fn missing_department_creates_nothing() {
        let store = Arc::new(MemoryStore::new());
        let ctx = signed_in_with("p1", store.clone(), Arc::new(crate::files::NoFilePicker));
        let mut screen = BookingScreen::new(ctx);
        screen.form = BookingForm {
            department: None,
            ..complete_form()
        };

        let mut nav = nav_at_booking();
        let err = screen.submit(&mut nav).unwrap_err();
        assert!(matches!(err, BookingError::MissingFields));
        assert_eq!(screen.status(), Some("Please fill all required fields."));
        assert_eq!(nav.current(), Route::BookAppointment);
        assert!(store.query(&Query::collection(APPOINTMENTS)).unwrap().is_empty());
    }

    #[test]
    fn validation_precedes_sign_in_check() {
        let mut screen = BookingScreen::new(memory_context());
        let mut nav = nav_at_booking();
        assert!(matches!(
            screen.submit(&mut nav),
            Err(BookingError::MissingFields)
        ));

        screen.form = complete_form();
        assert!(matches!(
            screen.submit(&mut nav),
            Err(BookingError::Auth(AuthError::NotSignedIn))
        ));
    }

    #[test]
    fn write_failure_is_reported() {
        let ctx = signed_in_with("p1", Arc::new(FailingStore), Arc::new(crate::files::NoFilePicker));
        let mut screen = BookingScreen::new(ctx);
        screen.form = complete_form();
        let mut nav = nav_at_booking();
        assert!(screen.submit(&mut nav).is_err());
        assert_eq!(
            screen.status(),
            Some("Error: Store unavailable: network unreachable")
        );
        assert_eq!(nav.current(), Route::BookAppointment);
    }

    #[test]
    fn blank_choice_counts_as_missing() {
        let form = BookingForm {
            time: Some("  ".into()),
            ..complete_form()
        };
        assert!(matches!(form.to_request("p1"), Err(BookingError::MissingFields)));
    }

    #[test]
    fn option_lists_come_from_config() {
        let screen = BookingScreen::new(memory_context());
        assert_eq!(screen.doctors(), ["Dr. Smith", "Dr. Jones", "Dr. Williams"]);
        assert!(screen.modes().iter().any(|m| m == "In-person"));
        assert!(!screen.departments().is_empty());
        assert!(!screen.visit_reasons().is_empty());
    }
}
