//! Authentication provider seam.
//!
//! The hosted auth service is an external collaborator: it yields an opaque
//! user id and the account email. [`MemoryAuthProvider`] stands in for it
//! on-device and in tests, storing PBKDF2-SHA256 password hashes.

use std::collections::HashMap;
use std::sync::RwLock;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;
use zeroize::Zeroize;

pub const SALT_LENGTH: usize = 16;
pub const HASH_LENGTH: usize = 32;

/// Identity of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Email or password can't be empty")]
    EmptyCredentials,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account already exists for {0}")]
    EmailInUse(String),
    #[error("No user is signed in")]
    NotSignedIn,
    #[error("Authentication service error: {0}")]
    Provider(String),
}

pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<AuthUser>;
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;
    /// Create the account and sign it in.
    fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;
    fn sign_out(&self);
}

/// PBKDF2 output, zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
struct PasswordHash([u8; HASH_LENGTH]);

impl PasswordHash {
    fn derive(password: &str, salt: &[u8; SALT_LENGTH], iterations: u32) -> Self {
        let mut out = [0u8; HASH_LENGTH];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
        Self(out)
    }

    fn verify(&self, other: &PasswordHash) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

struct Account {
    uid: String,
    email: String,
    salt: [u8; SALT_LENGTH],
    hash: PasswordHash,
}

fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::EmptyCredentials);
    }
    Ok(())
}

/// Local account registry with a single signed-in slot.
pub struct MemoryAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Option<AuthUser>>,
    iterations: u32,
}

impl MemoryAuthProvider {
    pub fn new(iterations: u32) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            current: RwLock::new(None),
            iterations: iterations.max(1),
        }
    }

    /// Provider with `user` already signed in and no stored account.
    pub fn signed_in(user: AuthUser) -> Self {
        let provider = Self::new(1);
        if let Ok(mut current) = provider.current.write() {
            *current = Some(user);
        }
        provider
    }

    fn set_current(&self, user: Option<AuthUser>) -> Result<(), AuthError> {
        let mut current = self
            .current
            .write()
            .map_err(|_| AuthError::Provider("session lock poisoned".into()))?;
        *current = user;
        Ok(())
    }
}

impl AuthProvider for MemoryAuthProvider {
    fn current_user(&self) -> Option<AuthUser> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        check_credentials(email, password)?;
        let user = {
            let accounts = self
                .accounts
                .read()
                .map_err(|_| AuthError::Provider("account lock poisoned".into()))?;
            let account = accounts
                .get(&normalize_email(email))
                .ok_or(AuthError::InvalidCredentials)?;
            let attempt = PasswordHash::derive(password, &account.salt, self.iterations);
            if !account.hash.verify(&attempt) {
                tracing::warn!("Sign-in rejected: bad password");
                return Err(AuthError::InvalidCredentials);
            }
            AuthUser {
                uid: account.uid.clone(),
                email: account.email.clone(),
            }
        };
        self.set_current(Some(user.clone()))?;
        tracing::info!(uid = %user.uid, "Signed in");
        Ok(user)
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        check_credentials(email, password)?;
        let key = normalize_email(email);
        let user = {
            let mut accounts = self
                .accounts
                .write()
                .map_err(|_| AuthError::Provider("account lock poisoned".into()))?;
            if accounts.contains_key(&key) {
                return Err(AuthError::EmailInUse(key));
            }
            let salt = generate_salt();
            let account = Account {
                uid: Uuid::new_v4().simple().to_string(),
                email: key.clone(),
                salt,
                hash: PasswordHash::derive(password, &salt, self.iterations),
            };
            let user = AuthUser {
                uid: account.uid.clone(),
                email: account.email.clone(),
            };
            accounts.insert(key, account);
            user
        };
        self.set_current(Some(user.clone()))?;
        tracing::info!(uid = %user.uid, "Account created");
        Ok(user)
    }

    fn sign_out(&self) {
        if self.set_current(None).is_ok() {
            tracing::info!("Signed out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MemoryAuthProvider {
        MemoryAuthProvider::new(10)
    }

    #[test]
    fn sign_up_signs_in() {
        let auth = provider();
        let user = auth.sign_up("Admin@Clinic.test ", "secret").unwrap();
        assert_eq!(user.email, "admin@clinic.test");
        assert_eq!(auth.current_user(), Some(user));
    }

    #[test]
    fn sign_in_checks_password() {
        let auth = provider();
        let created = auth.sign_up("a@clinic.test", "secret").unwrap();
        auth.sign_out();
        assert!(auth.current_user().is_none());

        assert_eq!(
            auth.sign_in("a@clinic.test", "wrong").unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert!(auth.current_user().is_none());

        let user = auth.sign_in("A@clinic.test", "secret").unwrap();
        assert_eq!(user.uid, created.uid);
    }

    #[test]
    fn empty_credentials_rejected() {
        let auth = provider();
        assert_eq!(auth.sign_in("", "x").unwrap_err(), AuthError::EmptyCredentials);
        assert_eq!(auth.sign_up("a@b", "").unwrap_err(), AuthError::EmptyCredentials);
        assert_eq!(
            AuthError::EmptyCredentials.to_string(),
            "Email or password can't be empty"
        );
    }

    #[test]
    fn duplicate_email_rejected() {
        let auth = provider();
        auth.sign_up("a@clinic.test", "one").unwrap();
        assert!(matches!(
            auth.sign_up("a@clinic.test", "two"),
            Err(AuthError::EmailInUse(_))
        ));
    }

    #[test]
    fn unknown_account_is_invalid_credentials() {
        let auth = provider();
        assert_eq!(
            auth.sign_in("ghost@clinic.test", "x").unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn same_password_different_salt_differs() {
        let a = PasswordHash::derive("pw", &[1u8; SALT_LENGTH], 10);
        let b = PasswordHash::derive("pw", &[2u8; SALT_LENGTH], 10);
        let c = PasswordHash::derive("pw", &[1u8; SALT_LENGTH], 10);
        assert!(!a.verify(&b));
        assert!(a.verify(&c));
    }
}
