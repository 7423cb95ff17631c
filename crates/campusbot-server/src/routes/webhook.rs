//! Loopback webhook receiver for fired reminders.

use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::routes::ApiResponse;
use campusbot_core::types::ReminderNotification;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Log an inbound reminder notification and acknowledge it. Lets a
/// deployment point the callback URL back at itself.
/// POST /api/webhook/reminder
pub async fn receive_reminder(
    Json(notification): Json<ReminderNotification>,
) -> ApiResult<Json<ApiResponse<WebhookAck>>> {
    info!(
        kind = %notification.kind,
        timestamp = %notification.timestamp,
        message = %notification.message,
        "Reminder notification received"
    );
    Ok(Json(ApiResponse::ok(WebhookAck { received: true })))
}
