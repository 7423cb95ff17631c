//! Process-wide mutable bot state.
//!
//! One `BotState` instance is owned by the dispatcher and passed in
//! explicitly; nothing else mutates it. All fields live behind a single
//! mutex so counter increments and the silence check stay atomic per key
//! even if the request path becomes concurrent.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// The two per-sender running-gag counters. Their firing rules are
/// deliberately different and live in the respective handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    /// "아일라" — fires at count 1 and 2, then resets.
    Aila,
    /// "요시" — warns on every hit, turns hostile at 3, never resets.
    Yoshi,
}

#[derive(Debug, Default)]
struct StateInner {
    is_active: bool,
    silence_until: Option<DateTime<Utc>>,
    counters: HashMap<(Counter, String), u32>,
}

/// Activation flag, silence deadline, and per-sender counters.
#[derive(Debug)]
pub struct BotState {
    admin_sender: String,
    inner: Mutex<StateInner>,
}

impl BotState {
    /// Create a fresh active state gated by the given admin identity.
    pub fn new(admin_sender: impl Into<String>) -> Self {
        Self {
            admin_sender: admin_sender.into(),
            inner: Mutex::new(StateInner {
                is_active: true,
                silence_until: None,
                counters: HashMap::new(),
            }),
        }
    }

    /// True only for the single configured admin identity.
    pub fn authorize_admin(&self, sender: &str) -> bool {
        sender == self.admin_sender
    }

    /// Whether non-admin dispatch is enabled.
    pub fn is_active(&self) -> bool {
        self.inner.lock().unwrap().is_active
    }

    /// Enable or disable non-admin dispatch.
    pub fn set_active(&self, active: bool) {
        self.inner.lock().unwrap().is_active = active;
    }

    /// Whether the bot is currently silenced at `now`.
    pub fn is_silent(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.inner.lock().unwrap().silence_until,
            Some(until) if now < until
        )
    }

    /// Silence the bot until the given deadline.
    pub fn enter_silence(&self, until: DateTime<Utc>) {
        self.inner.lock().unwrap().silence_until = Some(until);
    }

    /// Clear the silence deadline.
    pub fn clear_silence(&self) {
        self.inner.lock().unwrap().silence_until = None;
    }

    /// Increment a counter for a sender and return the new count.
    pub fn increment(&self, counter: Counter, sender: &str) -> u32 {
        let mut inner = self.inner.lock().unwrap();
        let count = inner
            .counters
            .entry((counter, sender.to_string()))
            .or_insert(0);
        *count += 1;
        *count
    }

    /// Reset a counter for a sender to zero.
    pub fn reset_counter(&self, counter: Counter, sender: &str) {
        self.inner
            .lock()
            .unwrap()
            .counters
            .insert((counter, sender.to_string()), 0);
    }

    /// Current count for a counter and sender.
    pub fn counter(&self, counter: Counter, sender: &str) -> u32 {
        self.inner
            .lock()
            .unwrap()
            .counters
            .get(&(counter, sender.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_admin_gate() {
        let state = BotState::new("박정욱");
        assert!(state.authorize_admin("박정욱"));
        assert!(!state.authorize_admin("김예준"));
    }

    #[test]
    fn test_activation_flag() {
        let state = BotState::new("박정욱");
        assert!(state.is_active());
        state.set_active(false);
        assert!(!state.is_active());
        state.set_active(true);
        assert!(state.is_active());
    }

    #[test]
    fn test_silence_deadline() {
        let state = BotState::new("박정욱");
        let now = Utc::now();
        assert!(!state.is_silent(now));

        state.enter_silence(now + Duration::minutes(10));
        assert!(state.is_silent(now));
        // Deadline passed: no longer silent without an explicit clear.
        assert!(!state.is_silent(now + Duration::minutes(11)));

        state.clear_silence();
        assert!(!state.is_silent(now));
    }

    #[test]
    fn test_counters_are_per_sender_and_per_counter() {
        let state = BotState::new("박정욱");
        assert_eq!(state.increment(Counter::Aila, "A"), 1);
        assert_eq!(state.increment(Counter::Aila, "A"), 2);
        assert_eq!(state.increment(Counter::Aila, "B"), 1);
        assert_eq!(state.increment(Counter::Yoshi, "A"), 1);

        state.reset_counter(Counter::Aila, "A");
        assert_eq!(state.counter(Counter::Aila, "A"), 0);
        assert_eq!(state.counter(Counter::Yoshi, "A"), 1);
        assert_eq!(state.counter(Counter::Aila, "B"), 1);
    }
}
