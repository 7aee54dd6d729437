use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-and-forward text message. No read or delivery state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sender_id: String,
    pub recipient: String,
    pub subject: String,
    #[serde(rename = "message")]
    pub body: String,
    /// Stored as epoch milliseconds so the database orders it numerically.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// One inbox row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagePreview {
    pub id: String,
    /// "You" when the viewing user sent the message, otherwise the sender id.
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub snippet: String,
}
