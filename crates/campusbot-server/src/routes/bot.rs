//! Bot activation status and admin control.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::routes::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BotStatusData {
    pub active: bool,
    pub silent: bool,
}

/// Current activation and silence state.
/// GET /api/bot/status
pub async fn bot_status(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<BotStatusData>>> {
    Ok(Json(ApiResponse::ok(BotStatusData {
        active: state.bot.is_active(),
        silent: state.bot.is_silent(Utc::now()),
    })))
}

#[derive(Debug, Deserialize)]
pub struct BotControlRequest {
    /// "activate" or "deactivate".
    pub action: String,
    /// Must match the configured admin identity.
    pub sender: String,
}

/// Activate or deactivate dispatch. Admin only.
/// POST /api/bot/control
pub async fn bot_control(
    State(state): State<AppState>,
    Json(request): Json<BotControlRequest>,
) -> ApiResult<Json<ApiResponse<BotStatusData>>> {
    if !state.bot.authorize_admin(&request.sender) {
        return Err(ApiError::forbidden(format!(
            "Sender '{}' is not the admin",
            request.sender
        )));
    }

    match request.action.as_str() {
        "activate" => {
            state.bot.set_active(true);
            state.bot.clear_silence();
        }
        "deactivate" => state.bot.set_active(false),
        other => {
            return Err(ApiError::validation(format!(
                "Unknown action '{}', expected 'activate' or 'deactivate'",
                other
            )))
        }
    }

    Ok(Json(ApiResponse::ok(BotStatusData {
        active: state.bot.is_active(),
        silent: state.bot.is_silent(Utc::now()),
    })))
}
