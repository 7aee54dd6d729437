use super::decode_all;
use crate::db::{to_fields, Direction, DocumentStore, Predicate, Query, StoreError};
use crate::models::*;

pub const MESSAGES: &str = "messages";

pub fn insert_message(store: &dyn DocumentStore, message: &Message) -> Result<String, StoreError> {
    let id = store.add(MESSAGES, to_fields(message)?)?;
    tracing::info!(%id, recipient = %message.recipient, "Message stored");
    Ok(id)
}

/// Messages sent by `user_id` or addressed to the shared admin recipient,
/// newest first.
pub fn list_inbox(
    store: &dyn DocumentStore,
    user_id: &str,
    admin_recipient: &str,
) -> Result<Vec<Stored<Message>>, StoreError> {
    let query = Query::collection(MESSAGES)
        .where_any(vec![
            Predicate::eq("senderId", user_id),
            Predicate::eq("recipient", admin_recipient),
        ])
        .order_by("timestamp", Direction::Descending);
    Ok(decode_all(MESSAGES, store.query(&query)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn message(sender: &str, recipient: &str, minute: u32) -> Message {
        Message {
            sender_id: sender.into(),
            recipient: recipient.into(),
            subject: "Inquiry".into(),
            body: format!("sent at {minute}"),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 10, minute, 0).unwrap(),
        }
    }

    #[test]
    fn inbox_is_sender_or_admin_newest_first() {
        let store = MemoryStore::new();
        insert_message(&store, &message("p1", "Dr. Raghav", 1)).unwrap();
        insert_message(&store, &message("p2", "Admin", 5)).unwrap();
        insert_message(&store, &message("p2", "Dr. Raghav", 7)).unwrap();
        insert_message(&store, &message("p1", "Admin", 3)).unwrap();

        let out = list_inbox(&store, "p1", "Admin").unwrap();
        let bodies: Vec<_> = out.iter().map(|s| s.record.body.as_str()).collect();
        assert_eq!(bodies, vec!["sent at 5", "sent at 3", "sent at 1"]);
        assert!(out
            .iter()
            .all(|s| s.record.sender_id == "p1" || s.record.recipient == "Admin"));
    }

    #[test]
    fn timestamp_is_stored_as_millis() {
        let store = MemoryStore::new();
        let m = message("p1", "Admin", 0);
        let id = insert_message(&store, &m).unwrap();
        let doc = store.get(MESSAGES, &id).unwrap().unwrap();
        assert_eq!(
            doc.get("timestamp").and_then(|v| v.as_i64()),
            Some(m.timestamp.timestamp_millis())
        );
        assert_eq!(doc.get_str("message"), Some("sent at 0"));
    }
}
