//! Axum handlers for `/api/*` routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::bot::NOT_READY_WARNING;
use crate::quick_actions::QuickAction;

use super::AppState;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct MessageRequest {
    message: String,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

fn not_ready() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, json_error("not_ready", NOT_READY_WARNING)).into_response()
}

fn unknown_session(session_id: Uuid) -> Response {
    (StatusCode::NOT_FOUND, json_error("not_found", format!("unknown session {session_id}"))).into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /api/health
pub(super) async fn health(State(state): State<AppState>) -> Response {
    let body = json!({
        "app": state.bot.app_name,
        "bot": state.bot.status(),
        "sessions": state.bot.sessions.len(),
    });
    (StatusCode::OK, Json(body)).into_response()
}

/// POST /api/sessions
pub(super) async fn create_session(State(state): State<AppState>) -> Response {
    let session_id = state.bot.sessions.create();
    (StatusCode::CREATED, Json(json!({ "session_id": session_id }))).into_response()
}

/// DELETE /api/sessions/{session_id}
pub(super) async fn end_session(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    if state.bot.sessions.remove(&session_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        unknown_session(session_id)
    }
}

/// GET /api/sessions/{session_id}/history
pub(super) async fn history(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    let Some(session) = state.bot.sessions.get(&session_id) else {
        return unknown_session(session_id);
    };
    let turns = session.lock().await.turns().to_vec();
    (StatusCode::OK, Json(turns)).into_response()
}

/// POST /api/sessions/{session_id}/messages
pub(super) async fn message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<MessageRequest>,
) -> Response {
    let Some(orchestrator) = state.bot.orchestrator() else {
        return not_ready();
    };
    let Some(session) = state.bot.sessions.get(&session_id) else {
        return unknown_session(session_id);
    };

    let utterance = req.message.trim();
    if utterance.is_empty() {
        return (StatusCode::BAD_REQUEST, json_error("empty_message", "message must not be empty")).into_response();
    }

    let mut session = session.lock().await;
    match orchestrator.process_turn(&mut session, utterance).await {
        Ok(turn) => (StatusCode::OK, Json(turn)).into_response(),
        Err(e) => {
            warn!(%session_id, error = %e, "turn failed");
            (
                StatusCode::BAD_GATEWAY,
                json_error("turn_failed", format!("Error processing request: {e}")),
            )
                .into_response()
        }
    }
}

/// POST /api/sessions/{session_id}/clear
pub(super) async fn clear_history(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    let Some(session) = state.bot.sessions.get(&session_id) else {
        return unknown_session(session_id);
    };
    session.lock().await.clear_history();
    StatusCode::NO_CONTENT.into_response()
}

/// GET /api/actions
pub(super) async fn actions() -> Response {
    let list: Vec<_> = QuickAction::ALL
        .iter()
        .map(|a| json!({ "name": a.name(), "label": a.label() }))
        .collect();
    (StatusCode::OK, Json(list)).into_response()
}

/// POST /api/actions/{name}
pub(super) async fn run_action(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    if !state.bot.is_ready() {
        return not_ready();
    }
    match QuickAction::from_name(&name) {
        Some(action) => {
            info!(action = action.name(), "quick action run");
            (StatusCode::OK, Json(action.result())).into_response()
        }
        None => (StatusCode::NOT_FOUND, json_error("not_found", format!("unknown quick action: {name}"))).into_response(),
    }
}
