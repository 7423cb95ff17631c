//! Core types shared across stores, dispatch, and the scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted reminder: a (time, content, origin) triple intended for
/// one-time delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Unique identifier.
    pub id: Uuid,
    /// When the reminder should fire (second precision).
    pub due_at: DateTime<Utc>,
    /// Free-text content.
    pub content: String,
    /// Room the reminder was created in.
    pub room: String,
    /// Sender who created the reminder.
    pub sender: String,
    /// When the reminder was created.
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Build a new reminder with a fresh id, stamped with the current time.
    pub fn new(
        due_at: DateTime<Utc>,
        content: impl Into<String>,
        room: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            due_at,
            content: content.into(),
            room: room.into(),
            sender: sender.into(),
            created_at: Utc::now(),
        }
    }

    /// Chat-formatted trigger line, e.g. `⏰ 14:30 리마인드: 회의`.
    pub fn trigger_line(&self) -> String {
        format!("⏰ {} 리마인드: {}", self.due_at.format("%H:%M"), self.content)
    }
}

/// An inbound chat message as seen by the dispatcher.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    /// Raw message text.
    pub message: String,
    /// Sender display identity.
    pub sender: String,
    /// Room the message arrived in.
    pub room: String,
}

impl IncomingMessage {
    pub fn new(
        message: impl Into<String>,
        sender: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            sender: sender.into(),
            room: room.into(),
        }
    }
}

/// Memo scope: one text value per room, or one per sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoScope {
    Room,
    Personal,
}

impl MemoScope {
    /// Stable name used as the scope column in the memo store.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoScope::Room => "room",
            MemoScope::Personal => "personal",
        }
    }
}

/// JSON body POSTed to the callback URL when reminders fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderNotification {
    /// Always "reminder".
    #[serde(rename = "type")]
    pub kind: String,
    /// Chat-formatted trigger lines, one per reminder, joined by newlines.
    pub message: String,
    /// Delivery timestamp (ISO-8601).
    pub timestamp: DateTime<Utc>,
}

impl ReminderNotification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: "reminder".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
