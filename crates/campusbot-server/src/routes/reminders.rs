//! Reminder listing.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::routes::ApiResponse;
use crate::state::AppState;
use campusbot_core::types::Reminder;

#[derive(Debug, Deserialize)]
pub struct ListRemindersQuery {
    /// Restrict to one room; omit for all rooms.
    pub room: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RemindersData {
    pub reminders: Vec<Reminder>,
    pub count: usize,
}

/// Pending reminders in creation order.
/// GET /api/reminders?room=
pub async fn list_reminders(
    State(state): State<AppState>,
    Query(query): Query<ListRemindersQuery>,
) -> ApiResult<Json<ApiResponse<RemindersData>>> {
    let reminders = state.reminders.list(query.room.as_deref())?;
    let count = reminders.len();
    Ok(Json(ApiResponse::ok(RemindersData { reminders, count })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRemindersQuery {
    pub room: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedData {
    pub deleted: usize,
}

/// Drop every pending reminder for a room.
/// DELETE /api/reminders?room=
pub async fn delete_reminders(
    State(state): State<AppState>,
    Query(query): Query<DeleteRemindersQuery>,
) -> ApiResult<Json<ApiResponse<DeletedData>>> {
    let deleted = state.reminders.delete_for_room(&query.room)?;
    Ok(Json(ApiResponse::ok(DeletedData { deleted })))
}
