//! End-to-end tests of the HTTP surface against the offline dummy provider.

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use helpdesk_bot::bot::Bot;
use helpdesk_bot::llm::LlmProvider;
use helpdesk_bot::llm::providers::dummy::{DummyFailure, DummyProvider};
use helpdesk_bot::web::build_router;

use common::{sample_kb, test_config};

async fn ready_router() -> Router {
    build_router(Arc::new(Bot::initialize(&test_config(&sample_kb())).await))
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn new_session(router: &Router) -> String {
    let (status, body) = send(router, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ready_bot() {
    let router = ready_router().await;
    let (status, body) = send(&router, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bot"]["status"], "ready");
    assert_eq!(body["bot"]["documents_count"], 12);
    assert_eq!(body["bot"]["knowledge_fallback"], false);
}

#[tokio::test]
async fn index_page_served() {
    let router = ready_router().await;
    let resp = router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("IT Helpdesk Chatbot"));
}

#[tokio::test]
async fn device_question_gets_combined_answer_and_history() {
    let router = ready_router().await;
    let id = new_session(&router).await;

    let (status, turn) = send(
        &router,
        "POST",
        &format!("/api/sessions/{id}/messages"),
        Some(json!({ "message": "  Is printer01 working?  " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(turn["question"], "Is printer01 working?");
    let answer = turn["answer"].as_str().unwrap();
    assert!(answer.starts_with("📚 "));
    assert!(answer.contains("🔧 *System Status:  Online and functioning normally."));
    assert_eq!(turn["timestamp"].as_str().unwrap().len(), 8);

    let (status, history) = send(&router, "GET", &format!("/api/sessions/{id}/history"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0], turn);
}

#[tokio::test]
async fn non_device_question_gets_additional_info() {
    let router = ready_router().await;
    let id = new_session(&router).await;
    let (status, turn) = send(
        &router,
        "POST",
        &format!("/api/sessions/{id}/messages"),
        Some(json!({ "message": "How do I reset my password?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(turn["answer"].as_str().unwrap().contains("💡 *Additional Info:  "));
}

#[tokio::test]
async fn unknown_device_reports_not_found() {
    let router = ready_router().await;
    let id = new_session(&router).await;
    let (_, turn) = send(
        &router,
        "POST",
        &format!("/api/sessions/{id}/messages"),
        Some(json!({ "message": "status of toaster99" })),
    )
    .await;
    assert!(turn["answer"].as_str().unwrap().ends_with("Device not found."));
}

#[tokio::test]
async fn clear_empties_history() {
    let router = ready_router().await;
    let id = new_session(&router).await;
    send(&router, "POST", &format!("/api/sessions/{id}/messages"), Some(json!({ "message": "wifi" }))).await;

    let (status, _) = send(&router, "POST", &format!("/api/sessions/{id}/clear"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, history) = send(&router, "GET", &format!("/api/sessions/{id}/history"), None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn sessions_are_isolated() {
    let router = ready_router().await;
    let a = new_session(&router).await;
    let b = new_session(&router).await;
    send(&router, "POST", &format!("/api/sessions/{a}/messages"), Some(json!({ "message": "email" }))).await;

    let (_, history) = send(&router, "GET", &format!("/api/sessions/{b}/history"), None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_message_rejected() {
    let router = ready_router().await;
    let id = new_session(&router).await;
    let (status, body) =
        send(&router, "POST", &format!("/api/sessions/{id}/messages"), Some(json!({ "message": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "empty_message");
}

#[tokio::test]
async fn unknown_session_is_404() {
    let router = ready_router().await;
    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&router, "GET", &format!("/api/sessions/{missing}/history"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&router, "DELETE", &format!("/api/sessions/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ended_session_is_gone() {
    let router = ready_router().await;
    let id = new_session(&router).await;
    let (status, _) = send(&router, "DELETE", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&router, "GET", &format!("/api/sessions/{id}/history"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quick_actions_listed_and_run() {
    let router = ready_router().await;
    let (status, list) = send(&router, "GET", "/api/actions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 5);

    let (status, result) = send(&router, "POST", "/api/actions/submit_ticket", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(result["body"].as_str().unwrap().contains("#ITK-2024-0789"));

    let (status, body) = send(&router, "POST", "/api/actions/format_disk", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn failed_turn_is_502_and_leaves_history_untouched() {
    let cfg = test_config(&sample_kb());
    let bot = Bot::initialize_with(&cfg, LlmProvider::Dummy(DummyProvider::failing(DummyFailure::ToolChat))).await;
    let router = build_router(Arc::new(bot));
    let id = new_session(&router).await;

    let (status, body) =
        send(&router, "POST", &format!("/api/sessions/{id}/messages"), Some(json!({ "message": "printer01" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["message"].as_str().unwrap().starts_with("Error processing request: "));

    let (_, history) = send(&router, "GET", &format!("/api/sessions/{id}/history"), None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn uninitialized_bot_refuses_chat_and_actions() {
    let mut cfg = test_config(&sample_kb());
    cfg.llm.provider = "azure".into();
    let router = build_router(Arc::new(Bot::initialize(&cfg).await));

    let (_, health) = send(&router, "GET", "/api/health", None).await;
    assert_eq!(health["bot"]["status"], "failed");
    assert!(health["bot"]["error"].as_str().unwrap().starts_with("Failed to initialize chatbot: "));

    let id = new_session(&router).await;
    let (status, body) =
        send(&router, "POST", &format!("/api/sessions/{id}/messages"), Some(json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "not_ready");

    let (status, _) = send(&router, "POST", "/api/actions/reset_password", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn empty_knowledge_file_reports_fallback_corpus() {
    let empty = tempfile::NamedTempFile::new().unwrap();
    let router = build_router(Arc::new(Bot::initialize(&test_config(empty.path())).await));
    let (_, health) = send(&router, "GET", "/api/health", None).await;
    assert_eq!(health["bot"]["status"], "ready");
    assert_eq!(health["bot"]["documents_count"], 4);
    assert_eq!(health["bot"]["knowledge_fallback"], true);
}
