//! Route definitions for the HTTP API.

mod bot;
mod health;
mod memory;
mod message;
mod reminders;
mod scheduler;
mod webhook;

use axum::{
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;

use crate::state::AppState;

/// Standard success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Chat entry point
        .route("/api/message", post(message::handle_message))
        // Bot control
        .route("/api/bot/status", get(bot::bot_status))
        .route("/api/bot/control", post(bot::bot_control))
        // Reminders
        .route("/api/reminders", get(reminders::list_reminders))
        .route("/api/reminders", delete(reminders::delete_reminders))
        // Scheduler control
        .route("/api/scheduler/start", post(scheduler::start_scheduler))
        .route("/api/scheduler/stop", post(scheduler::stop_scheduler))
        .route("/api/scheduler/status", get(scheduler::scheduler_status))
        // Memo debug dump
        .route("/api/memory/list", get(memory::list_memos))
        // Loopback webhook receiver
        .route("/api/webhook/reminder", post(webhook::receive_reminder))
        // Attach state
        .with_state(state)
}

pub use bot::*;
pub use health::*;
pub use memory::*;
pub use message::*;
pub use reminders::*;
pub use scheduler::*;
pub use webhook::*;
