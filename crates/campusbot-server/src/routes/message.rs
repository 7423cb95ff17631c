//! Chat message entry point.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiResult;
use crate::routes::ApiResponse;
use crate::state::AppState;
use campusbot_core::types::IncomingMessage;

#[derive(Debug, Serialize)]
pub struct MessageData {
    /// Reply text, or null when no handler matched or the bot is silent.
    pub response: Option<String>,
}

/// Run one chat message through the dispatch chain.
/// POST /api/message
pub async fn handle_message(
    State(state): State<AppState>,
    Json(request): Json<IncomingMessage>,
) -> ApiResult<Json<ApiResponse<MessageData>>> {
    let response = state.dispatcher.dispatch(&request);
    Ok(Json(ApiResponse::ok(MessageData { response })))
}
