//! Dummy LLM provider. Runs fully offline.
//!
//! Chat echoes the last user message prefixed with `[echo]`. When tools are
//! offered and the message contains a device-like token (letters followed by
//! digits, e.g. `printer01`), it answers with a call to the first tool using
//! that token as `device_id`. Embeddings are hashed bag-of-words vectors, so
//! similarity search still ranks lexically close documents first.
//!
//! An optional [`DummyFailure`] makes one capability fail, for exercising
//! error paths end to end.

use serde_json::{Value, json};

use crate::llm::{ChatMessage, ChatReply, ProviderError, Role, ToolCall};

const EMBEDDING_DIM: usize = 64;

/// Which call the dummy should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyFailure {
    Embeddings,
    /// Chat calls made without tools.
    Chat,
    /// Chat calls made with tools.
    ToolChat,
}

#[derive(Debug, Clone, Default)]
pub struct DummyProvider {
    failure: Option<DummyFailure>,
}

impl DummyProvider {
    pub fn failing(failure: DummyFailure) -> Self {
        Self { failure: Some(failure) }
    }

    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if self.failure == Some(DummyFailure::Embeddings) {
            return Err(ProviderError::Request("dummy embeddings failure".into()));
        }
        Ok(texts.iter().map(|t| hashed_embedding(t)).collect())
    }

    pub async fn chat(&self, messages: &[ChatMessage], tools: &[Value]) -> Result<ChatReply, ProviderError> {
        let failing = match self.failure {
            Some(DummyFailure::Chat) => tools.is_empty(),
            Some(DummyFailure::ToolChat) => !tools.is_empty(),
            _ => false,
        };
        if failing {
            return Err(ProviderError::Request("dummy chat failure".into()));
        }

        let content = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if let Some(tool_name) = tools.first().and_then(|t| t["name"].as_str()) {
            if let Some(device_id) = content.split(|c: char| !c.is_ascii_alphanumeric()).find(|w| looks_like_device(w)) {
                return Ok(ChatReply {
                    content: None,
                    tool_calls: vec![ToolCall {
                        name: tool_name.to_string(),
                        arguments: json!({ "device_id": device_id }).to_string(),
                    }],
                });
            }
        }

        Ok(ChatReply::text(format!("[echo] {content}")))
    }
}

/// Letters then digits, at least one of each: `router23`, `nas01`.
fn looks_like_device(word: &str) -> bool {
    let split = word.find(|c: char| c.is_ascii_digit()).unwrap_or(word.len());
    let (alpha, digits) = word.split_at(split);
    !alpha.is_empty()
        && !digits.is_empty()
        && alpha.chars().all(|c| c.is_ascii_alphabetic())
        && digits.chars().all(|c| c.is_ascii_digit())
}

fn hashed_embedding(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; EMBEDDING_DIM];
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
    {
        v[(fnv1a(&token) % EMBEDDING_DIM as u64) as usize] += 1.0;
    }
    v
}

fn fnv1a(s: &str) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in s.bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::status_tool;

    #[tokio::test]
    async fn chat_echoes_last_user_message() {
        let p = DummyProvider::default();
        let msgs = [ChatMessage::system("sys"), ChatMessage::user("hello there")];
        let reply = p.chat(&msgs, &[]).await.unwrap();
        assert_eq!(reply.content.as_deref(), Some("[echo] hello there"));
        assert!(reply.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn device_token_triggers_tool_call() {
        let p = DummyProvider::default();
        let msgs = [ChatMessage::user("is printer01 up?")];
        let reply = p.chat(&msgs, &[status_tool()]).await.unwrap();
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].name, "check_system_status");
        let args: Value = serde_json::from_str(&reply.tool_calls[0].arguments).unwrap();
        assert_eq!(args["device_id"], "printer01");
    }

    #[tokio::test]
    async fn device_token_ignored_without_tools() {
        let p = DummyProvider::default();
        let reply = p.chat(&[ChatMessage::user("printer01")], &[]).await.unwrap();
        assert!(reply.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn embeddings_are_deterministic() {
        let p = DummyProvider::default();
        let texts = vec!["reset my password".to_string(), "Reset my PASSWORD".to_string()];
        let v = p.embed(&texts).await.unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].len(), EMBEDDING_DIM);
        assert_eq!(v[0], v[1]);
    }

    #[tokio::test]
    async fn configured_failures() {
        let p = DummyProvider::failing(DummyFailure::ToolChat);
        assert!(p.chat(&[ChatMessage::user("x")], &[]).await.is_ok());
        assert!(p.chat(&[ChatMessage::user("x")], &[status_tool()]).await.is_err());

        let p = DummyProvider::failing(DummyFailure::Embeddings);
        assert!(p.embed(&["a".to_string()]).await.is_err());
    }

    #[test]
    fn device_shape() {
        assert!(looks_like_device("printer01"));
        assert!(looks_like_device("accesspoint03"));
        assert!(!looks_like_device("printer"));
        assert!(!looks_like_device("01"));
        assert!(!looks_like_device("p0p"));
    }
}
