//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete backends. Two capabilities are
//! exposed: batch embeddings and chat completion with optional tools.
//! Provider instances are immutable and cheap to clone.

pub mod providers;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("provider misconfigured: {0}")]
    Config(String),
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("unexpected provider response: {0}")]
    Response(String),
}

// ── Message types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// A model-initiated function invocation. `arguments` is the raw JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), tool_calls: Vec::new() }
    }

    /// Reply text, or an error when the model returned none.
    pub fn into_text(self) -> Result<String, ProviderError> {
        self.content
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProviderError::Response("empty or missing content in response".into()))
    }
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    Azure(providers::azure_openai::AzureOpenAiProvider),
}

impl LlmProvider {
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::Dummy(_) => "dummy",
            LlmProvider::Azure(_) => "azure",
        }
    }

    /// Embed `texts`, one vector per input, in input order.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.embed(texts).await,
            LlmProvider::Azure(p) => p.embed(texts).await,
        }
    }

    /// One chat-completion round-trip. `tools` are function schemas; when
    /// non-empty the model may answer with tool calls (`tool_choice = auto`).
    pub async fn chat(&self, messages: &[ChatMessage], tools: &[Value]) -> Result<ChatReply, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.chat(messages, tools).await,
            LlmProvider::Azure(p) => p.chat(messages, tools).await,
        }
    }
}
