use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::assistant::reply;
use crate::errors::AppError;
use crate::models::lenient::{lenient_optional_text, lenient_text};
use crate::state::AppState;

/// A `null` message reads as empty; a `null` or blank session id as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    #[serde(deserialize_with = "lenient_text")]
    pub message: String,
    #[serde(deserialize_with = "lenient_optional_text")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
}

/// POST /api/v1/chat
///
/// A missing or blank `session_id` starts a new conversation under a fresh id,
/// which is echoed back so the client can continue it.
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    let session_id = request
        .session_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let reply = reply(
        &state.generation,
        &state.sessions,
        &session_id,
        &request.message,
    )
    .await;

    debug!(active_sessions = state.sessions.len(), "Chat turn handled");

    Ok(Json(ChatResponse { reply, session_id }))
}
