//! Profile registration after sign-up.

use crate::auth::AuthError;
use crate::context::AppContext;
use crate::db::repository;
use crate::db::StoreError;
use crate::models::{Role, RoleDetails, UserProfile};
use crate::router::{Navigator, Route};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminFields {
    pub branch_access: String,
    pub designation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialistFields {
    pub department: String,
    pub specialization: String,
    pub branch_location: String,
    pub availability: String,
    pub medical_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFields {
    pub date_of_birth: String,
    pub gender: String,
    pub preferred_branch: String,
    pub medical_notes: String,
}

/// Registration form. Only the group matching `role` is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub role: Role,
    pub full_name: String,
    pub mobile_number: String,
    pub admin: AdminFields,
    pub specialist: SpecialistFields,
    pub patient: PatientFields,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            role: Role::Patient,
            full_name: String::new(),
            mobile_number: String::new(),
            admin: AdminFields::default(),
            specialist: SpecialistFields::default(),
            patient: PatientFields::default(),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl RegistrationForm {
    pub fn submit_label(&self) -> String {
        format!("Complete Registration as {}", self.role)
    }

    pub fn to_profile(&self, email: &str) -> UserProfile {
        let details = match self.role {
            Role::Admin => RoleDetails::Admin {
                branch_access: self.admin.branch_access.clone(),
                designation: optional(&self.admin.designation),
            },
            Role::Specialist => RoleDetails::Specialist {
                department: self.specialist.department.clone(),
                specialization: self.specialist.specialization.clone(),
                branch_location: self.specialist.branch_location.clone(),
                availability: self.specialist.availability.clone(),
                medical_id: optional(&self.specialist.medical_id),
            },
            Role::Patient => RoleDetails::Patient {
                date_of_birth: self.patient.date_of_birth.clone(),
                gender: self.patient.gender.clone(),
                preferred_branch: self.patient.preferred_branch.clone(),
                medical_notes: optional(&self.patient.medical_notes),
            },
        };
        UserProfile {
            full_name: self.full_name.clone(),
            email: email.to_string(),
            mobile_number: self.mobile_number.clone(),
            details,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Error saving profile: {0}")]
    Store(#[from] StoreError),
}

/// Write `users/{uid}` for the signed-in user, then go to login.
pub fn register(
    ctx: &AppContext,
    nav: &mut Navigator,
    form: &RegistrationForm,
) -> Result<UserProfile, RegistrationError> {
    let user = ctx.require_user().map_err(|e| {
        tracing::error!("Registration without a signed-in user");
        RegistrationError::from(e)
    })?;

    let profile = form.to_profile(&user.email);
    repository::save_profile(ctx.store.as_ref(), &user.uid, &profile).map_err(|e| {
        tracing::warn!(uid = %user.uid, error = %e, "Error adding user data");
        RegistrationError::from(e)
    })?;

    nav.navigate(Route::Login);
    Ok(profile)
}
