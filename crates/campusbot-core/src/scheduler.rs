//! Background reminder scheduler.
//!
//! An explicit ticking task: the loop wakes every second, runs the due-check
//! once per logical minute, and delivers whatever `pop_due` hands back.
//! Cancellation is a token, not a flag polled between sleeps; `stop()` is
//! idempotent and returns without waiting for in-flight delivery.

use crate::config::BotConfig;
use crate::notify::ReminderNotifier;
use crate::store::ReminderStore;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

struct RunningTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Polls the reminder store and notifies the webhook endpoint and trigger
/// log when reminders fire.
pub struct ReminderScheduler {
    store: Arc<dyn ReminderStore>,
    notifier: Arc<ReminderNotifier>,
    tick_interval: Duration,
    error_backoff: Duration,
    task: Mutex<Option<RunningTask>>,
}

impl ReminderScheduler {
    pub fn new(store: Arc<dyn ReminderStore>, config: &BotConfig) -> Self {
        Self {
            store,
            notifier: Arc::new(ReminderNotifier::new(config)),
            tick_interval: config.tick_interval,
            error_backoff: config.error_backoff,
            task: Mutex::new(None),
        }
    }

    /// Whether the background task is currently running.
    pub fn is_running(&self) -> bool {
        self.task.lock().unwrap().is_some()
    }

    /// Start the background loop. Starting an already-running scheduler is
    /// a no-op with a warning, not an error.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap();
        if task.is_some() {
            warn!("Reminder scheduler already running");
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            self.store.clone(),
            self.notifier.clone(),
            self.tick_interval,
            self.error_backoff,
            cancel.clone(),
        ));

        *task = Some(RunningTask { cancel, handle });
        info!("Reminder scheduler started");
    }

    /// Stop the background loop. Safe to call at any time, including before
    /// start or on an already-stopped scheduler; does not wait for in-flight
    /// delivery.
    pub fn stop(&self) {
        let mut task = self.task.lock().unwrap();
        match task.take() {
            Some(running) => {
                running.cancel.cancel();
                // The task notices the token at its next await point; the
                // handle is dropped without being joined.
                drop(running.handle);
                info!("Reminder scheduler stopped");
            }
            None => {
                debug!("Reminder scheduler stop requested while not running");
            }
        }
    }

    /// Run one due-check immediately, outside the scheduled cadence.
    pub async fn run_once(&self) {
        check_and_notify(&self.store, &self.notifier).await;
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        if let Some(running) = self.task.lock().unwrap().take() {
            running.cancel.cancel();
        }
    }
}

async fn run_loop(
    store: Arc<dyn ReminderStore>,
    notifier: Arc<ReminderNotifier>,
    tick_interval: Duration,
    error_backoff: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_checked_minute: Option<i64> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Reminder loop cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        // Tick every second, fire the check once per logical minute.
        let minute = Utc::now().timestamp() / 60;
        if last_checked_minute == Some(minute) {
            continue;
        }
        last_checked_minute = Some(minute);

        if let Err(()) = try_check(&store, &notifier).await {
            // Loop errors back off and continue; the worker never dies.
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(error_backoff) => {}
            }
        }
    }
}

async fn try_check(store: &Arc<dyn ReminderStore>, notifier: &Arc<ReminderNotifier>) -> Result<(), ()> {
    let now = Utc::now();
    debug!(at = %now.format("%H:%M:%S"), "Checking due reminders");

    let due = match store.pop_due(now) {
        Ok(due) => due,
        Err(err) => {
            error!(error = %err, "Due-reminder check failed");
            return Err(());
        }
    };

    if due.is_empty() {
        return Ok(());
    }

    let message = due
        .iter()
        .map(|r| r.trigger_line())
        .collect::<Vec<_>>()
        .join("\n");
    info!(count = due.len(), "Reminders fired");
    notifier.deliver(&message).await;
    Ok(())
}

async fn check_and_notify(store: &Arc<dyn ReminderStore>, notifier: &Arc<ReminderNotifier>) {
    let _ = try_check(store, notifier).await;
}
