//! Error types for campusbot operations.
//!
//! User-facing failures (bad commands, permission denials) are distinct from
//! infrastructure failures (database, webhook delivery) so callers can decide
//! what to report back into the chat and what to only log.

use thiserror::Error;

/// Result type alias for campusbot operations.
pub type BotResult<T> = Result<T, BotError>;

/// Main error type for all campusbot operations.
#[derive(Error, Debug)]
pub enum BotError {
    /// Input validation failed (malformed time, empty content, past due-time,
    /// unrecognized delete target). Reported back to the chat caller as plain
    /// text, never fatal.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        /// Korean rejection text to hand back to the chat transport.
        reply: Option<String>,
    },

    /// A non-admin sender invoked an admin-only action. No state change.
    #[error("Permission denied for sender '{sender}'")]
    Permission { sender: String },

    /// Durable store operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Webhook delivery failed (unreachable endpoint or non-2xx status).
    /// Logged and swallowed by the scheduler, never retried.
    #[error("Delivery error: {message}")]
    Delivery { message: String },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            reply: None,
        }
    }

    /// Create a validation error with a chat-facing rejection text.
    pub fn validation_with_reply(message: impl Into<String>, reply: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            reply: Some(reply.into()),
        }
    }

    /// Create a permission error.
    pub fn permission(sender: impl Into<String>) -> Self {
        Self::Permission {
            sender: sender.into(),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Create a delivery error.
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Chat-facing rejection text, if this error should be reported in-chat.
    pub fn chat_reply(&self) -> Option<&str> {
        match self {
            Self::Validation { reply, .. } => reply.as_deref(),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for BotError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        Self::Delivery {
            message: err.to_string(),
        }
    }
}
