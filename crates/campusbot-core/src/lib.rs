//! campusbot-core - Core library for campusbot.
//!
//! This crate provides the stores, bot state, intent dispatch chain, and the
//! background reminder scheduler behind the chat responder. The HTTP surface
//! lives in `campusbot-server`.
//!
//! # Example
//!
//! ```ignore
//! use campusbot_core::{BotConfig, BotState, Dispatcher};
//! use campusbot_core::dispatch::{CannedMeals, CannedWeather};
//! use campusbot_core::store::{SqliteMemoStore, SqliteReminderStore};
//! use campusbot_core::types::IncomingMessage;
//! use std::sync::Arc;
//!
//! let config = BotConfig::from_env();
//! let state = Arc::new(BotState::new(&config.admin_sender));
//! let reminders = Arc::new(SqliteReminderStore::in_memory()?);
//! let memos = Arc::new(SqliteMemoStore::in_memory()?);
//!
//! let dispatcher = Dispatcher::new(
//!     &config, state, reminders, memos,
//!     Arc::new(CannedWeather), Arc::new(CannedMeals),
//! );
//!
//! let reply = dispatcher.dispatch(&IncomingMessage::new("!기억 점심약속", "사용자1", "방"));
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod notify;
pub mod scheduler;
pub mod state;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::BotConfig;
pub use dispatch::{Dispatch, Dispatcher, IntentHandler};
pub use error::{BotError, BotResult};
pub use notify::ReminderNotifier;
pub use scheduler::ReminderScheduler;
pub use state::{BotState, Counter};
pub use store::{
    MemoStore, ReminderStore, SqliteMemoStore, SqliteReminderStore, TRIGGER_WINDOW_SECS,
};
pub use types::{IncomingMessage, MemoScope, Reminder, ReminderNotification};
