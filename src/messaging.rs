//! Patient/staff messaging: compose and inbox.
//!
//! Messages are store-and-forward documents. The inbox shows what the user
//! sent plus everything addressed to the shared admin recipient.

use std::sync::Arc;

use chrono::Utc;

use crate::auth::AuthError;
use crate::context::AppContext;
use crate::db::repository;
use crate::db::{DocumentStore, StoreError};
use crate::load::{spawn_load, LoadSlot, LoadState};
use crate::models::{Message, MessagePreview, Stored};

pub const SENT_MESSAGE: &str = "Message sent successfully!";
pub const EMPTY_INBOX_MESSAGE: &str = "No messages yet.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMessageForm {
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Please fill all fields.")]
    MissingFields,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Error sending message: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageTab {
    NewMessage,
    #[default]
    Inbox,
}

/// Store a message from `sender_id`, stamped now.
pub fn send_message(
    store: &dyn DocumentStore,
    sender_id: &str,
    form: &NewMessageForm,
) -> Result<String, MessageError> {
    let (Some(recipient), Some(subject)) = (form.recipient.as_deref(), form.subject.as_deref())
    else {
        return Err(MessageError::MissingFields);
    };
    if recipient.is_empty() || subject.is_empty() || form.body.is_empty() {
        return Err(MessageError::MissingFields);
    }

    let message = Message {
        sender_id: sender_id.to_string(),
        recipient: recipient.to_string(),
        subject: subject.to_string(),
        body: form.body.clone(),
        timestamp: Utc::now(),
    };
    Ok(repository::insert_message(store, &message)?)
}

/// Inbox rows for `user_id`, newest first.
pub fn inbox(
    store: &dyn DocumentStore,
    user_id: &str,
    admin_recipient: &str,
    preview_chars: usize,
) -> Result<Vec<MessagePreview>, StoreError> {
    let messages = repository::list_inbox(store, user_id, admin_recipient)?;
    Ok(messages
        .into_iter()
        .map(|stored| preview(stored, user_id, preview_chars))
        .collect())
}

fn preview(stored: Stored<Message>, user_id: &str, preview_chars: usize) -> MessagePreview {
    let Stored { id, record } = stored;
    let sender = if record.sender_id == user_id {
        "You".to_string()
    } else {
        record.sender_id
    };
    MessagePreview {
        id,
        sender,
        recipient: record.recipient,
        subject: record.subject,
        snippet: record.body.chars().take(preview_chars).collect(),
    }
}

pub struct MessagingScreen {
    ctx: AppContext,
    pub tab: MessageTab,
    pub form: NewMessageForm,
    status: Option<String>,
    slot: Arc<LoadSlot<MessagePreview>>,
}

impl MessagingScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            tab: MessageTab::default(),
            form: NewMessageForm::default(),
            status: None,
            slot: Arc::new(LoadSlot::new()),
        }
    }

    pub fn recipients(&self) -> &[String] {
        &self.ctx.config.message_recipients
    }

    pub fn subjects(&self) -> &[String] {
        &self.ctx.config.message_subjects
    }

    /// Send the composed message. The form is cleared on success.
    pub fn send(&mut self) -> Result<String, MessageError> {
        let result = self.try_send();
        match &result {
            Ok(_) => {
                self.status = Some(SENT_MESSAGE.to_string());
                self.form = NewMessageForm::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Message not sent");
                self.status = Some(e.to_string());
            }
        }
        result
    }

    fn try_send(&self) -> Result<String, MessageError> {
        let NewMessageForm {
            recipient,
            subject,
            body,
        } = &self.form;
        if recipient.is_none() || subject.is_none() || body.is_empty() {
            return Err(MessageError::MissingFields);
        }
        let user = self.ctx.require_user()?;
        send_message(self.ctx.store.as_ref(), &user.uid, &self.form)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub async fn reload_inbox(&self) -> Result<bool, AuthError> {
        let user = self.ctx.require_user()?;
        let store = Arc::clone(&self.ctx.store);
        let config = Arc::clone(&self.ctx.config);
        Ok(spawn_load(Arc::clone(&self.slot), move || {
            inbox(
                store.as_ref(),
                &user.uid,
                &config.admin_recipient,
                config.preview_chars,
            )
            .map_err(|e| e.to_string())
        })
        .await)
    }

    pub fn previews(&self) -> Vec<MessagePreview> {
        self.slot.items()
    }

    pub fn state(&self) -> LoadState<MessagePreview> {
        self.slot.snapshot()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        let state = self.slot.snapshot();
        (state.applied_seq > 0 && state.items.is_empty()).then_some(EMPTY_INBOX_MESSAGE)
    }
}
