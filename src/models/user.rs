use serde::{Deserialize, Serialize};

use super::enums::Role;

/// Profile document stored at `users/{uid}`.
///
/// The role tag and the role-specific fields sit flat in the document
/// next to the common fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(flatten)]
    pub details: RoleDetails,
}

impl UserProfile {
    pub fn role(&self) -> Role {
        self.details.role()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all_fields = "camelCase")]
pub enum RoleDetails {
    Admin {
        #[serde(default)]
        branch_access: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        designation: Option<String>,
    },
    Specialist {
        #[serde(default)]
        department: String,
        #[serde(default)]
        specialization: String,
        #[serde(default)]
        branch_location: String,
        #[serde(default)]
        availability: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        medical_id: Option<String>,
    },
    Patient {
        #[serde(default)]
        date_of_birth: String,
        #[serde(default)]
        gender: String,
        #[serde(default)]
        preferred_branch: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        medical_notes: Option<String>,
    },
}

impl RoleDetails {
    pub fn role(&self) -> Role {
        match self {
            Self::Admin { .. } => Role::Admin,
            Self::Specialist { .. } => Role::Specialist,
            Self::Patient { .. } => Role::Patient,
        }
    }
}
