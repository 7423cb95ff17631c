//! Durable stores for reminders and memos.
//!
//! Both stores are SQLite-backed behind a `Mutex<Connection>`, so every
//! mutating caller (request path or scheduler poll) serializes through a
//! single writer. A missing database file is an empty store, not an error.

mod memos;
mod reminders;

pub use memos::{MemoStore, SqliteMemoStore};
pub use reminders::{ReminderStore, SqliteReminderStore, TRIGGER_WINDOW_SECS};
