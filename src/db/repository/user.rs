use crate::db::{to_fields, Document, DocumentStore, StoreError};
use crate::models::UserProfile;

pub const USERS: &str = "users";

/// Write the profile at `users/{uid}`, replacing any previous one.
pub fn save_profile(
    store: &dyn DocumentStore,
    uid: &str,
    profile: &UserProfile,
) -> Result<(), StoreError> {
    store.set(USERS, uid, to_fields(profile)?)?;
    tracing::info!(%uid, role = %profile.role(), "User profile saved");
    Ok(())
}

/// Raw profile document; the session gate reads `role` from it before
/// committing to a typed decode.
pub fn get_profile_document(
    store: &dyn DocumentStore,
    uid: &str,
) -> Result<Option<Document>, StoreError> {
    store.get(USERS, uid)
}

pub fn get_profile(store: &dyn DocumentStore, uid: &str) -> Result<Option<UserProfile>, StoreError> {
    get_profile_document(store, uid)?
        .map(|doc| doc.decode())
        .transpose()
}
