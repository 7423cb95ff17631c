//! Memo debug dump.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiResult;
use crate::routes::ApiResponse;
use crate::state::AppState;
use campusbot_core::types::MemoScope;

#[derive(Debug, Serialize)]
pub struct MemoEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct MemoListData {
    pub room: Vec<MemoEntry>,
    pub personal: Vec<MemoEntry>,
}

fn entries(pairs: Vec<(String, String)>) -> Vec<MemoEntry> {
    pairs
        .into_iter()
        .map(|(key, value)| MemoEntry { key, value })
        .collect()
}

/// Dump both memo scopes.
/// GET /api/memory/list
pub async fn list_memos(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<MemoListData>>> {
    let room = entries(state.memos.list(MemoScope::Room)?);
    let personal = entries(state.memos.list(MemoScope::Personal)?);
    Ok(Json(ApiResponse::ok(MemoListData { room, personal })))
}
