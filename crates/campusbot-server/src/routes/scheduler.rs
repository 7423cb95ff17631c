//! Scheduler lifecycle control.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiResult;
use crate::routes::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SchedulerData {
    pub running: bool,
}

/// Start the background reminder loop. No-op if already running.
/// POST /api/scheduler/start
pub async fn start_scheduler(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SchedulerData>>> {
    state.scheduler.start();
    Ok(Json(ApiResponse::ok(SchedulerData {
        running: state.scheduler.is_running(),
    })))
}

/// Stop the background reminder loop. No-op if not running.
/// POST /api/scheduler/stop
pub async fn stop_scheduler(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SchedulerData>>> {
    state.scheduler.stop();
    Ok(Json(ApiResponse::ok(SchedulerData {
        running: state.scheduler.is_running(),
    })))
}

/// Whether the background loop is running.
/// GET /api/scheduler/status
pub async fn scheduler_status(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SchedulerData>>> {
    Ok(Json(ApiResponse::ok(SchedulerData {
        running: state.scheduler.is_running(),
    })))
}
