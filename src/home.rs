//! Home dashboards: the data each role's landing view shows.
//!
//! The menus themselves live in [`crate::router::HomeScreen`]; this module
//! only assembles the summary cards from the signed-in user's profile and
//! their appointments.

use chrono::NaiveDate;
use serde::Serialize;

use crate::auth::AuthError;
use crate::context::AppContext;
use crate::db::repository;
use crate::db::StoreError;
use crate::models::{AppointmentRequest, RoleDetails, ScheduleFilter, UserProfile};

pub const NO_UPCOMING_MESSAGE: &str = "No upcoming appointments";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingAppointment {
    pub doctor: String,
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientHome {
    pub name: String,
    pub branch: String,
    pub upcoming: Option<UpcomingAppointment>,
}

impl PatientHome {
    pub fn upcoming_line(&self) -> String {
        match &self.upcoming {
            Some(a) => format!("{} | {}", a.doctor, a.time),
            None => NO_UPCOMING_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialistHome {
    pub name: String,
    pub appointments_today: usize,
    /// (time, patient id) in time order.
    pub schedule: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminHome {
    pub title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum HomeError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("User data not found. Please complete registration.")]
    ProfileMissing,
    #[error("Error retrieving user data. Please try again.")]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn current_profile(ctx: &AppContext) -> Result<(String, UserProfile), HomeError> {
    let user = ctx.require_user()?;
    let profile =
        repository::get_profile(ctx.store.as_ref(), &user.uid)?.ok_or(HomeError::ProfileMissing)?;
    Ok((user.uid, profile))
}

/// The earliest open appointment on or after `today`.
pub fn next_upcoming<'a>(
    appointments: impl IntoIterator<Item = &'a AppointmentRequest>,
    today: NaiveDate,
) -> Option<&'a AppointmentRequest> {
    appointments
        .into_iter()
        .filter(|a| a.date >= today && !a.status.is_terminal())
        .min_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)))
}

pub fn patient_home(ctx: &AppContext, today: NaiveDate) -> Result<PatientHome, HomeError> {
    let (uid, profile) = current_profile(ctx)?;
    let branch = match &profile.details {
        RoleDetails::Patient {
            preferred_branch, ..
        } => preferred_branch.clone(),
        _ => String::new(),
    };

    let appointments = repository::list_for_patient(ctx.store.as_ref(), &uid)?;
    let upcoming = next_upcoming(appointments.iter().map(|s| &s.record), today).map(|a| {
        UpcomingAppointment {
            doctor: a.doctor.clone(),
            date: a.date,
            time: a.time.clone(),
        }
    });

    Ok(PatientHome {
        name: profile.full_name,
        branch,
        upcoming,
    })
}

/// Today's appointments whose doctor matches the specialist's full name.
pub fn specialist_home(ctx: &AppContext, today: NaiveDate) -> Result<SpecialistHome, HomeError> {
    let (_, profile) = current_profile(ctx)?;
    let filter = ScheduleFilter {
        doctor: profile.full_name.clone(),
        date: today,
        patient_prefix: None,
    };
    let schedule: Vec<(String, String)> = repository::list_for_specialist(ctx.store.as_ref(), &filter)?
        .into_iter()
        .map(|s| (s.record.time, s.record.patient_id))
        .collect();

    Ok(SpecialistHome {
        name: profile.full_name,
        appointments_today: schedule.len(),
        schedule,
    })
}

pub fn admin_home(ctx: &AppContext) -> AdminHome {
    AdminHome {
        title: format!("Admin Panel - {}", ctx.config.clinic_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use crate::testing::signed_in_context;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn appointment(patient: &str, doctor: &str, day: u32, time: &str, status: AppointmentStatus) -> AppointmentRequest {
        AppointmentRequest {
            patient_id: patient.into(),
            department: "General Medicine".into(),
            doctor: doctor.into(),
            reason: "Fever".into(),
            date: date(day),
            time: time.into(),
            mode: "In-person".into(),
            status,
            report_uri: None,
        }
    }

    fn save(ctx: &AppContext, uid: &str, name: &str, details: RoleDetails) {
        let profile = UserProfile {
            full_name: name.into(),
            email: format!("{uid}@clinic.test"),
            mobile_number: "0".into(),
            details,
        };
        repository::save_profile(ctx.store.as_ref(), uid, &profile).unwrap();
    }

    #[test]
    fn patient_sees_next_open_appointment() {
        let ctx = signed_in_context("p1");
        save(
            &ctx,
            "p1",
            "Kavya",
            RoleDetails::Patient {
                date_of_birth: "1999-02-02".into(),
                gender: "F".into(),
                preferred_branch: "North".into(),
                medical_notes: None,
            },
        );
        let store = ctx.store.as_ref();
        for a in [
            appointment("p1", "Dr. Old", 1, "09:00", AppointmentStatus::Accepted),
            appointment("p1", "Dr. Gone", 10, "09:00", AppointmentStatus::Cancelled),
            appointment("p1", "Dr. Later", 12, "08:00", AppointmentStatus::Pending),
            appointment("p1", "Dr. Next", 10, "11:00", AppointmentStatus::Accepted),
            appointment("p2", "Dr. Other", 10, "07:00", AppointmentStatus::Accepted),
        ] {
            repository::insert_appointment(store, &a).unwrap();
        }

        let home = patient_home(&ctx, date(5)).unwrap();
        assert_eq!(home.name, "Kavya");
        assert_eq!(home.branch, "North");
        assert_eq!(home.upcoming_line(), "Dr. Next | 11:00");
        let next = home.upcoming.unwrap();
        assert_eq!(next.doctor, "Dr. Next");
        assert_eq!(next.time, "11:00");

        let later = patient_home(&ctx, date(20)).unwrap();
        assert!(later.upcoming.is_none());
        assert_eq!(later.upcoming_line(), NO_UPCOMING_MESSAGE);
    }

    #[test]
    fn specialist_sees_todays_rows() {
        let ctx = signed_in_context("s1");
        save(
            &ctx,
            "s1",
            "Dr. Raghav",
            RoleDetails::Specialist {
                department: "Neurology".into(),
                specialization: "Stroke".into(),
                branch_location: "Central".into(),
                availability: "Daily".into(),
                medical_id: None,
            },
        );
        let store = ctx.store.as_ref();
        repository::insert_appointment(store, &appointment("p2", "Dr. Raghav", 3, "13:00", AppointmentStatus::Accepted)).unwrap();
        repository::insert_appointment(store, &appointment("p1", "Dr. Raghav", 3, "09:00", AppointmentStatus::Accepted)).unwrap();
        repository::insert_appointment(store, &appointment("p3", "Dr. Raghav", 4, "09:00", AppointmentStatus::Accepted)).unwrap();

        let home = specialist_home(&ctx, date(3)).unwrap();
        assert_eq!(home.appointments_today, 2);
        assert_eq!(
            home.schedule,
            vec![
                ("09:00".to_string(), "p1".to_string()),
                ("13:00".to_string(), "p2".to_string())
            ]
        );
    }

    #[test]
    fn missing_profile_is_reported() {
        let ctx = signed_in_context("ghost");
        let err = patient_home(&ctx, date(1)).unwrap_err();
        assert!(matches!(err, HomeError::ProfileMissing));
    }

    #[test]
    fn admin_title_uses_clinic_name() {
        let ctx = signed_in_context("a1");
        assert_eq!(admin_home(&ctx).title, "Admin Panel - KIOT Health");
    }
}
