//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{domain::Board, infrastructure::dto::http::UserDto, ui::state::AppState};

/// Debug endpoint to get the current board (for testing purposes)
pub async fn debug_board_state(State(state): State<Arc<AppState>>) -> Json<Board> {
    Json(state.get_board_state_usecase.execute().await)
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of online users
pub async fn get_users(State(state): State<Arc<AppState>>) -> Json<Vec<UserDto>> {
    let participants = state.get_users_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(participants.iter().map(UserDto::from).collect())
}
