//! Configuration for the bot core.

use std::time::Duration;

/// Configuration for stores, dispatcher, and the reminder scheduler.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// The single sender identity permitted to mutate bot activation state.
    pub admin_sender: String,
    /// How long a silence command suppresses replies (default: 600 s).
    pub silence_duration: Duration,
    /// Webhook endpoint the scheduler notifies when reminders fire
    /// (None = log-only).
    pub callback_url: Option<String>,
    /// Webhook request timeout (default: 5 s, never retried).
    pub webhook_timeout: Duration,
    /// Path to the append-only reminder trigger log.
    pub trigger_log_path: String,
    /// Path to the SQLite database for reminders and memos
    /// (default: campusbot.db; None = in-memory, for tests).
    pub db_path: Option<String>,
    /// Scheduler tick interval (default: 1 s; the due-check itself fires once
    /// per logical minute).
    pub tick_interval: Duration,
    /// How long the scheduler loop backs off after an error (default: 10 s).
    pub error_backoff: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            admin_sender: "박정욱".to_string(),
            silence_duration: Duration::from_secs(600),
            callback_url: None,
            webhook_timeout: Duration::from_secs(5),
            trigger_log_path: "reminder_log.txt".to_string(),
            db_path: Some("campusbot.db".to_string()),
            tick_interval: Duration::from_secs(1),
            error_backoff: Duration::from_secs(10),
        }
    }
}

impl BotConfig {
    /// Set the admin sender identity.
    pub fn with_admin(mut self, sender: impl Into<String>) -> Self {
        self.admin_sender = sender.into();
        self
    }

    /// Set the silence duration.
    pub fn with_silence_duration(mut self, duration: Duration) -> Self {
        self.silence_duration = duration;
        self
    }

    /// Set the webhook callback URL.
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// Set the database path.
    pub fn with_db_path(mut self, path: impl Into<String>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    /// Use in-memory stores instead of the database file (for tests).
    pub fn with_in_memory_db(mut self) -> Self {
        self.db_path = None;
        self
    }

    /// Set the trigger log path.
    pub fn with_trigger_log_path(mut self, path: impl Into<String>) -> Self {
        self.trigger_log_path = path.into();
        self
    }

    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `CAMPUSBOT_ADMIN` (default: 박정욱)
    /// - `CAMPUSBOT_SILENCE_SECS` (default: 600)
    /// - `CAMPUSBOT_CALLBACK_URL` (default: none = log-only)
    /// - `CAMPUSBOT_DB_PATH` (default: campusbot.db)
    /// - `CAMPUSBOT_TRIGGER_LOG` (default: reminder_log.txt)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(admin) = std::env::var("CAMPUSBOT_ADMIN") {
            config.admin_sender = admin;
        }

        if let Ok(secs) = std::env::var("CAMPUSBOT_SILENCE_SECS") {
            if let Ok(secs) = secs.parse() {
                config.silence_duration = Duration::from_secs(secs);
            }
        }

        if let Ok(url) = std::env::var("CAMPUSBOT_CALLBACK_URL") {
            config.callback_url = Some(url);
        }

        if let Ok(path) = std::env::var("CAMPUSBOT_DB_PATH") {
            config.db_path = Some(path);
        }

        if let Ok(path) = std::env::var("CAMPUSBOT_TRIGGER_LOG") {
            config.trigger_log_path = path;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.admin_sender, "박정욱");
        assert_eq!(config.silence_duration, Duration::from_secs(600));
        assert_eq!(config.webhook_timeout, Duration::from_secs(5));
        assert!(config.callback_url.is_none());
        // The database is file-backed unless explicitly switched off.
        assert_eq!(config.db_path.as_deref(), Some("campusbot.db"));
        assert!(config.with_in_memory_db().db_path.is_none());
    }

    #[test]
    fn test_config_builders() {
        let config = BotConfig::default()
            .with_admin("관리자")
            .with_callback_url("http://localhost:9000/api/webhook/reminder")
            .with_silence_duration(Duration::from_secs(60));
        assert_eq!(config.admin_sender, "관리자");
        assert_eq!(
            config.callback_url.as_deref(),
            Some("http://localhost:9000/api/webhook/reminder")
        );
        assert_eq!(config.silence_duration, Duration::from_secs(60));
    }
}
