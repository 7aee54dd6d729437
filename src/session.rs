//! Session gate: sign-in, sign-up, sign-out and role resolution.
//!
//! After authentication the gate reads `users/{uid}` and routes on its
//! `role` field. Every failure leaves the navigator where it was.

use std::str::FromStr;

use crate::auth::{AuthError, AuthUser};
use crate::context::AppContext;
use crate::db::repository;
use crate::db::StoreError;
use crate::models::Role;
use crate::router::{Navigator, Route};

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("No user is signed in")]
    NotSignedIn,
    #[error("User data not found. Please complete registration.")]
    ProfileMissing,
    /// Absent, or not one of the known roles.
    #[error("User role not defined. Contact support.")]
    RoleMissing,
    #[error("Error retrieving user data. Please try again.")]
    Lookup(#[source] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Gate(#[from] GateError),
}

pub struct SessionGate;

impl SessionGate {
    /// Resolve the signed-in user's role from their profile document.
    pub fn resolve(ctx: &AppContext) -> Result<Role, GateError> {
        let user = ctx.auth.current_user().ok_or(GateError::NotSignedIn)?;

        let doc = repository::get_profile_document(ctx.store.as_ref(), &user.uid)
            .map_err(|e| {
                tracing::error!(uid = %user.uid, error = %e, "Profile lookup failed");
                GateError::Lookup(e)
            })?
            .ok_or_else(|| {
                tracing::warn!(uid = %user.uid, "No profile for signed-in user");
                GateError::ProfileMissing
            })?;

        let raw = doc.get_str("role").ok_or(GateError::RoleMissing)?;
        Role::from_str(raw).map_err(|_| {
            tracing::warn!(uid = %user.uid, role = raw, "Profile has unrecognised role");
            GateError::RoleMissing
        })
    }
}

/// Sign in and route to the role's home.
pub fn login(
    ctx: &AppContext,
    nav: &mut Navigator,
    email: &str,
    password: &str,
) -> Result<Role, LoginError> {
    ctx.auth.sign_in(email, password)?;
    let role = SessionGate::resolve(ctx)?;
    tracing::info!(%role, "Login routed");
    nav.navigate(Route::Home(role));
    Ok(role)
}

/// Create an account and continue to registration.
pub fn signup(
    ctx: &AppContext,
    nav: &mut Navigator,
    email: &str,
    password: &str,
) -> Result<AuthUser, AuthError> {
    let user = ctx.auth.sign_up(email, password)?;
    nav.navigate(Route::Registration);
    Ok(user)
}

pub fn sign_out(ctx: &AppContext, nav: &mut Navigator) {
    ctx.auth.sign_out();
    nav.reset_to(Route::Login);
}
