//! Reminder delivery: webhook POST plus a durable append-only trigger log.
//!
//! Delivery is at-most-once and best-effort. A failed POST is logged and
//! swallowed, never retried and never re-queued.

use crate::config::BotConfig;
use crate::error::{BotError, BotResult};
use crate::types::ReminderNotification;
use chrono::Local;
use reqwest::Client;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

/// Sends fired reminders to the configured callback URL and records them in
/// the trigger log.
pub struct ReminderNotifier {
    client: Client,
    callback_url: Option<String>,
    trigger_log_path: PathBuf,
}

impl ReminderNotifier {
    pub fn new(config: &BotConfig) -> Self {
        let client = Client::builder()
            .timeout(config.webhook_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            callback_url: config.callback_url.clone(),
            trigger_log_path: PathBuf::from(&config.trigger_log_path),
        }
    }

    /// Deliver a fired-reminder message: webhook first (if configured),
    /// then the trigger log. Failures on either path are logged and
    /// swallowed so the scheduler loop keeps running.
    pub async fn deliver(&self, message: &str) {
        if let Err(err) = self.send_webhook(message).await {
            error!(error = %err, "Webhook delivery failed");
        }
        if let Err(err) = self.log_trigger(message) {
            error!(error = %err, "Trigger log write failed");
        }
    }

    /// POST `{type, message, timestamp}` to the callback URL. No-op when no
    /// URL is configured.
    pub async fn send_webhook(&self, message: &str) -> BotResult<()> {
        let Some(url) = &self.callback_url else {
            return Ok(());
        };

        let payload = ReminderNotification::new(message);
        let response = self.client.post(url).json(&payload).send().await?;

        let status = response.status();
        if status.is_success() {
            info!(url = %url, "Webhook delivered");
            Ok(())
        } else {
            Err(BotError::delivery(format!(
                "webhook endpoint returned {}",
                status
            )))
        }
    }

    /// Append one timestamped line to the trigger log.
    pub fn log_trigger(&self, message: &str) -> BotResult<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.trigger_log_path)?;
        writeln!(
            file,
            "[{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        )?;
        Ok(())
    }
}

impl std::fmt::Debug for ReminderNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderNotifier")
            .field("callback_url", &self.callback_url)
            .field("trigger_log_path", &self.trigger_log_path)
            .finish()
    }
}
