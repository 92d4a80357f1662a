use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AskRequest, ChatSession, ChatTurn, SessionCreated};
use crate::services::chat_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id/messages", post(post_message))
}

/// POST /api/chat/sessions
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    info!("POST /api/chat/sessions - Creating session");
    let session_id = state.sessions.create();
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// GET /api/chat/sessions/:id
///
/// The full message log for redisplay.
#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatSession>, AppError> {
    info!("GET /api/chat/sessions/{}", id);
    state.sessions.get(&id).map(Json).ok_or(AppError::NotFound)
}

/// POST /api/chat/sessions/:id/messages
///
/// Runs one chat turn against the selected portfolio.
///
/// Request body: AskRequest
/// {
///   "portfolio_name": "Growth",
///   "question": "How is my portfolio doing?"
/// }
#[axum::debug_handler]
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<ChatTurn>, AppError> {
    info!(
        "POST /api/chat/sessions/{}/messages - Question: {}",
        id, request.question
    );

    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question must not be empty".to_string()));
    }
    if request.portfolio_name.trim().is_empty() {
        return Err(AppError::Validation(
            "portfolio_name must not be empty".to_string(),
        ));
    }

    let turn = chat_service::run_turn(
        &state.sessions,
        &state.fetcher,
        state.llm.clone(),
        id,
        &request.portfolio_name,
        &request.question,
    )
    .await
    .map_err(|e| {
        error!("Failed to run chat turn for session {}: {}", id, e);
        e
    })?;

    Ok(Json(turn))
}
