pub mod appointment;
pub mod attendance;
pub mod enums;
pub mod filters;
pub mod message;
pub mod user;

pub use appointment::*;
pub use attendance::*;
pub use enums::*;
pub use filters::*;
pub use message::*;
pub use user::*;

use serde::Serialize;

/// A decoded record paired with its document id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stored<T> {
    pub id: String,
    pub record: T,
}
