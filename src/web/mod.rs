//! Axum HTTP surface: chat page plus JSON API.
//!
//! ## URL layout
//!
//! ```text
//! GET    /                                chat page
//! GET    /favicon.ico                     204
//! GET    /api/health
//! POST   /api/sessions
//! DELETE /api/sessions/{session_id}
//! GET    /api/sessions/{session_id}/history
//! POST   /api/sessions/{session_id}/messages
//! POST   /api/sessions/{session_id}/clear
//! GET    /api/actions
//! POST   /api/actions/{name}
//! ```

mod api;
mod ui;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bot::Bot;
use crate::error::AppError;

/// Router state injected into every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<Bot>,
}

pub fn build_router(bot: Arc<Bot>) -> Router {
    Router::new()
        .route("/api/health",                           get(api::health))
        .route("/api/sessions",                         post(api::create_session))
        .route("/api/sessions/{session_id}",            delete(api::end_session))
        .route("/api/sessions/{session_id}/history",    get(api::history))
        .route("/api/sessions/{session_id}/messages",   post(api::message))
        .route("/api/sessions/{session_id}/clear",      post(api::clear_history))
        .route("/api/actions",                          get(api::actions))
        .route("/api/actions/{name}",                   post(api::run_action))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .route("/",            get(ui::root))
        .with_state(AppState { bot })
}

/// Bind `bind_addr` and serve until `shutdown` is cancelled. The idle
/// session sweeper runs for the same lifetime.
pub async fn serve(bind_addr: &str, bot: Arc<Bot>, shutdown: CancellationToken) -> Result<(), AppError> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Comms(format!("bind failed on {bind_addr}: {e}")))?;

    let sweeper_bot = bot.clone();
    let sweeper_shutdown = shutdown.clone();
    tokio::spawn(async move { sweeper_bot.sessions.run_sweeper(sweeper_shutdown).await });

    let router = build_router(bot);

    info!(%bind_addr, "helpdesk web UI listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Comms(format!("server error: {e}")))?;

    info!("web server shut down");
    Ok(())
}
