//! Azure OpenAI provider: chat completions with tools, and embeddings.
//!
//! Deployments are addressed as
//! `{endpoint}/openai/deployments/{deployment}/{operation}?api-version={v}`
//! and authenticated with the `api-key` header. Chat and embeddings may live
//! on different resources with different keys. All wire types are private to
//! this module.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, trace};

use crate::config::LlmConfig;
use crate::llm::{ChatMessage, ChatReply, ProviderError, ToolCall};

// ── Public provider ───────────────────────────────────────────────────────────

/// Constructed once at startup, then cheaply cloned because
/// `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct AzureOpenAiProvider {
    client: Client,
    chat_url: String,
    chat_api_key: String,
    embeddings_url: String,
    embeddings_api_key: String,
    chat_deployment: String,
    embedding_deployment: String,
    temperature: Option<f32>,
    embedding_batch_size: usize,
}

impl AzureOpenAiProvider {
    /// Build from config. Endpoints and keys must all be present.
    ///
    /// With `ssl_verify` off, invalid TLS certificates are accepted.
    pub fn new(config: &LlmConfig) -> Result<Self, ProviderError> {
        let creds = &config.credentials;
        let chat_endpoint = required(&creds.chat_endpoint, "AZURE_OPENAI_ENDPOINT")?;
        let chat_api_key = required(&creds.chat_api_key, "AZURE_OPENAI_API_KEY")?;
        let embeddings_endpoint = required(&creds.embeddings_endpoint, "AZURE_EMBEDDINGS_ENDPOINT")?;
        let embeddings_api_key = required(&creds.embeddings_api_key, "AZURE_EMBEDDINGS_API_KEY")?;

        let azure = &config.azure;
        let client = Client::builder()
            .timeout(Duration::from_secs(azure.timeout_seconds))
            .danger_accept_invalid_certs(!config.ssl_verify)
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            chat_url: deployment_url(&chat_endpoint, &azure.chat_deployment, "chat/completions", &azure.api_version),
            chat_api_key,
            embeddings_url: deployment_url(
                &embeddings_endpoint,
                &azure.embedding_deployment,
                "embeddings",
                &azure.api_version,
            ),
            embeddings_api_key,
            chat_deployment: azure.chat_deployment.clone(),
            embedding_deployment: azure.embedding_deployment.clone(),
            temperature: azure.temperature,
            embedding_batch_size: azure.embedding_batch_size.max(1),
        })
    }

    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut out = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.embedding_batch_size) {
            let payload = EmbeddingsRequest {
                input: batch.iter().map(String::as_str).collect(),
                model: &self.embedding_deployment,
            };
            debug!(model = %self.embedding_deployment, inputs = batch.len(), "sending embeddings request");

            let response = self
                .client
                .post(&self.embeddings_url)
                .header("api-key", &self.embeddings_api_key)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    error!(url = %self.embeddings_url, error = %e, "embeddings HTTP request failed (transport)");
                    ProviderError::Request(e.to_string())
                })?;

            let response = check_status(response).await?;
            let parsed = response.json::<EmbeddingsResponse>().await.map_err(|e| {
                error!(error = %e, "failed to deserialize embeddings response");
                ProviderError::Response(format!("failed to parse embeddings body: {e}"))
            })?;

            out.extend(order_embeddings(parsed, batch.len())?);
        }

        Ok(out)
    }

    /// One chat-completions round-trip. Tool-call resolution belongs to the
    /// caller; this method only reports what the model asked for.
    pub async fn chat(&self, messages: &[ChatMessage], tools: &[Value]) -> Result<ChatReply, ProviderError> {
        let payload = ChatCompletionRequest {
            model: &self.chat_deployment,
            messages,
            temperature: self.temperature,
            tools: tools
                .iter()
                .map(|function| ToolDefinition { kind: "function", function })
                .collect(),
            tool_choice: (!tools.is_empty()).then_some("auto"),
        };

        debug!(
            model = %self.chat_deployment,
            messages = messages.len(),
            tools = tools.len(),
            "sending chat request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full chat request payload");
        }

        let response = self
            .client
            .post(&self.chat_url)
            .header("api-key", &self.chat_api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.chat_url, error = %e, "chat HTTP request failed (transport)");
                ProviderError::Request(e.to_string())
            })?;

        let response = check_status(response).await?;

        let parsed = response.json::<ChatCompletionResponse>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize chat response");
            ProviderError::Response(format!("failed to parse response body: {e}"))
        })?;

        debug!(choices = parsed.choices.len(), "received chat response");
        into_reply(parsed)
    }
}

fn required(value: &Option<String>, var: &str) -> Result<String, ProviderError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| ProviderError::Config(format!("{var} is not set")))
}

fn deployment_url(endpoint: &str, deployment: &str, operation: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{deployment}/{operation}?api-version={api_version}",
        endpoint.trim_end_matches('/')
    )
}

fn into_reply(parsed: ChatCompletionResponse) -> Result<ChatReply, ProviderError> {
    let message = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| ProviderError::Response("no choices in response".into()))?;

    Ok(ChatReply {
        content: message.content,
        tool_calls: message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|c| ToolCall { name: c.function.name, arguments: c.function.arguments })
            .collect(),
    })
}

fn order_embeddings(parsed: EmbeddingsResponse, expected: usize) -> Result<Vec<Vec<f32>>, ProviderError> {
    let mut data = parsed.data;
    if data.len() != expected {
        return Err(ProviderError::Response(format!(
            "expected {expected} embeddings, got {}",
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolDefinition<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct ToolDefinition<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    function: WireFunctionCall,
}

#[derive(Debug, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    input: Vec<&'a str>,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

// Error envelope used by OpenAI and Azure OpenAI.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<Value>,
}

/// Return the response if successful, otherwise a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = if let Ok(env) = serde_json::from_str::<ErrorEnvelope>(&body) {
        let code = env
            .error
            .code
            .map(|v| match v {
                Value::String(s) => format!(" [code={s}]"),
                other => format!(" [code={other}]"),
            })
            .unwrap_or_default();
        format!("HTTP {status}{code}: {}", env.error.message)
    } else {
        format!("HTTP {status}: {body}")
    };

    error!(%status, %message, "Azure OpenAI request returned HTTP error");
    Err(ProviderError::Request(message))
}
