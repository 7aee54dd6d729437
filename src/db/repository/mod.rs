//! Repository layer: collection-scoped typed operations.
//!
//! Every read decodes documents into typed records. A document that fails
//! to decode is logged and skipped; it never fails the whole list.

mod appointment;
mod attendance;
mod message;
mod user;

use serde::de::DeserializeOwned;

use super::Document;
use crate::models::Stored;

pub use appointment::*;
pub use attendance::*;
pub use message::*;
pub use user::*;

/// Decode a query result, dropping (and logging) undecodable documents.
pub(crate) fn decode_all<T: DeserializeOwned>(kind: &str, docs: Vec<Document>) -> Vec<Stored<T>> {
    docs.into_iter()
        .filter_map(|doc| match doc.decode::<T>() {
            Ok(record) => Some(Stored { id: doc.id, record }),
            Err(e) => {
                tracing::warn!(id = %doc.id, kind, error = %e, "Skipping undecodable document");
                None
            }
        })
        .collect()
}
