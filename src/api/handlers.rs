use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{MediaEntry, Session},
    services::{
        library::{LibraryFilter, ProgressUpdate},
        ChatReply,
    },
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LibraryResponse {
    pub session_id: String,
    pub items: Vec<MediaEntry>,
}

// Handlers

/// Liveness plus the usage counters
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "metrics": state.metrics.snapshot(),
        })),
    )
}

/// Runs one conversational turn. A missing session id starts a new session.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatReply> {
    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Json(state.orchestrator.process(&session_id, &request.message).await)
}

pub async fn get_library(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(filter): Query<LibraryFilter>,
) -> Json<LibraryResponse> {
    let items = state.library.list(&session_id, filter).await;
    Json(LibraryResponse { session_id, items })
}

/// Partially updates progress or status for one library entry
pub async fn update_progress(
    State(state): State<AppState>,
    Path((session_id, item_id)): Path<(String, String)>,
    Json(update): Json<ProgressUpdate>,
) -> AppResult<Json<Value>> {
    if !state
        .library
        .update_progress(&session_id, &item_id, update)
        .await
    {
        return Err(AppError::ItemNotFound { session_id, item_id });
    }

    Ok(Json(json!({ "updated": true })))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<Session>> {
    state
        .sessions
        .get(&session_id)
        .await
        .map(Json)
        .ok_or(AppError::SessionNotFound(session_id))
}
