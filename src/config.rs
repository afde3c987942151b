//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` (or the file named by `HELPDESK_CONFIG`), then
//! applies the `HELPDESK_*` overrides. Endpoints, API keys and the TLS
//! verification switch come from the environment only, never from TOML.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::error::AppError;
use crate::logger;

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Socket address the web UI and API bind to.
    pub bind: String,
}

/// Azure OpenAI deployment settings (`[llm.azure]`).
#[derive(Debug, Clone)]
pub struct AzureConfig {
    /// `api-version` query parameter sent with every request.
    pub api_version: String,
    /// Chat-completions deployment name.
    pub chat_deployment: String,
    /// Embeddings deployment (model) name.
    pub embedding_deployment: String,
    /// Sampling temperature; omitted from requests when unset.
    pub temperature: Option<f32>,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Max texts per embeddings request.
    pub embedding_batch_size: usize,
}

/// Endpoints and keys sourced from the environment.
#[derive(Debug, Clone, Default)]
pub struct AzureCredentials {
    pub chat_endpoint: Option<String>,
    pub chat_api_key: Option<String>,
    pub embeddings_endpoint: Option<String>,
    pub embeddings_api_key: Option<String>,
}

/// LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Active provider: `"azure"` or `"dummy"`.
    pub provider: String,
    pub azure: AzureConfig,
    pub credentials: AzureCredentials,
    /// Verify TLS certificates on outbound calls (`SSL_VERIFY`).
    pub ssl_verify: bool,
}

/// Retrieval chain settings.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Number of knowledge documents handed to the answer prompt.
    pub top_k: usize,
    /// Directory holding the prompt templates.
    pub prompts_dir: PathBuf,
}

/// Session lifetime settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sessions untouched for this long are dropped by the sweeper.
    pub idle_timeout: Duration,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub log_level: String,
    /// CSV knowledge base path.
    pub knowledge_base: PathBuf,
    pub http: HttpConfig,
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub sessions: SessionConfig,
}

/// Overrides applied on top of the TOML file.
///
/// `load()` fills this from the environment; tests build it directly.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_level: Option<String>,
    pub bind: Option<String>,
    pub knowledge_base: Option<String>,
    pub credentials: AzureCredentials,
    pub ssl_verify: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("HELPDESK_LOG_LEVEL").ok(),
            bind: env::var("HELPDESK_BIND").ok(),
            knowledge_base: env::var("HELPDESK_KNOWLEDGE_BASE").ok(),
            credentials: AzureCredentials {
                chat_endpoint: env::var("AZURE_OPENAI_ENDPOINT").ok(),
                chat_api_key: env::var("AZURE_OPENAI_API_KEY").ok(),
                embeddings_endpoint: env::var("AZURE_EMBEDDINGS_ENDPOINT").ok(),
                embeddings_api_key: env::var("AZURE_EMBEDDINGS_API_KEY").ok(),
            },
            ssl_verify: env::var("SSL_VERIFY").ok(),
        }
    }
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawConfig {
    app: RawApp,
    #[serde(default)]
    http: RawHttp,
    #[serde(default)]
    llm: RawLlm,
    #[serde(default)]
    retrieval: RawRetrieval,
    #[serde(default)]
    sessions: RawSessions,
}

#[derive(Deserialize)]
struct RawApp {
    #[serde(default = "default_app_name")]
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_knowledge_base")]
    knowledge_base: String,
}

#[derive(Deserialize)]
struct RawHttp {
    #[serde(default = "default_http_bind")]
    bind: String,
}

impl Default for RawHttp {
    fn default() -> Self {
        Self { bind: default_http_bind() }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    azure: RawAzure,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), azure: RawAzure::default() }
    }
}

#[derive(Deserialize)]
struct RawAzure {
    #[serde(default = "default_api_version")]
    api_version: String,
    #[serde(default = "default_chat_deployment")]
    chat_deployment: String,
    #[serde(default = "default_embedding_deployment")]
    embedding_deployment: String,
    #[serde(default)]
    temperature: Option<f32>,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
    #[serde(default = "default_embedding_batch_size")]
    embedding_batch_size: usize,
}

impl Default for RawAzure {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            chat_deployment: default_chat_deployment(),
            embedding_deployment: default_embedding_deployment(),
            temperature: None,
            timeout_seconds: default_timeout_seconds(),
            embedding_batch_size: default_embedding_batch_size(),
        }
    }
}

#[derive(Deserialize)]
struct RawRetrieval {
    #[serde(default = "default_top_k")]
    top_k: usize,
    #[serde(default = "default_prompts_dir")]
    prompts_dir: String,
}

impl Default for RawRetrieval {
    fn default() -> Self {
        Self { top_k: default_top_k(), prompts_dir: default_prompts_dir() }
    }
}

#[derive(Deserialize)]
struct RawSessions {
    #[serde(default = "default_idle_timeout_seconds")]
    idle_timeout_seconds: u64,
}

impl Default for RawSessions {
    fn default() -> Self {
        Self { idle_timeout_seconds: default_idle_timeout_seconds() }
    }
}

fn default_app_name() -> String { "IT Helpdesk Chatbot".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_knowledge_base() -> String { "data/helpdesk_knowledge_base.csv".to_string() }
fn default_http_bind() -> String { "127.0.0.1:8080".to_string() }
fn default_llm_provider() -> String { "azure".to_string() }
fn default_api_version() -> String { "2024-02-01".to_string() }
fn default_chat_deployment() -> String { "GPT-4o-mini".to_string() }
fn default_embedding_deployment() -> String { "text-embedding-3-small".to_string() }
fn default_timeout_seconds() -> u64 { 60 }
fn default_embedding_batch_size() -> usize { 256 }
fn default_top_k() -> usize { 4 }
fn default_prompts_dir() -> String { "config/prompts".to_string() }
fn default_idle_timeout_seconds() -> u64 { 3600 }

/// `SSL_VERIFY` is on only for a case-insensitive `"true"`.
pub fn parse_ssl_verify(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Load config from `HELPDESK_CONFIG` or `config/default.toml`, then apply
/// environment overrides.
pub fn load() -> Result<Config, AppError> {
    let path = env::var("HELPDESK_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    load_from(Path::new(&path), Overrides::from_env())
}

/// Internal loader: explicit path and overrides, no env access.
pub fn load_from(path: &Path, overrides: Overrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let log_level = overrides.log_level.unwrap_or(parsed.app.log_level);
    logger::parse_level(&log_level).map_err(|e| AppError::Config(e.to_string()))?;

    if parsed.retrieval.top_k == 0 {
        return Err(AppError::Config("retrieval.top_k must be at least 1".into()));
    }
    if parsed.sessions.idle_timeout_seconds == 0 {
        return Err(AppError::Config("sessions.idle_timeout_seconds must be at least 1".into()));
    }
    if parsed.llm.azure.embedding_batch_size == 0 {
        return Err(AppError::Config("llm.azure.embedding_batch_size must be at least 1".into()));
    }

    let azure = parsed.llm.azure;

    Ok(Config {
        app_name: parsed.app.name,
        log_level,
        knowledge_base: PathBuf::from(
            overrides.knowledge_base.unwrap_or(parsed.app.knowledge_base),
        ),
        http: HttpConfig { bind: overrides.bind.unwrap_or(parsed.http.bind) },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            azure: AzureConfig {
                api_version: azure.api_version,
                chat_deployment: azure.chat_deployment,
                embedding_deployment: azure.embedding_deployment,
                temperature: azure.temperature,
                timeout_seconds: azure.timeout_seconds,
                embedding_batch_size: azure.embedding_batch_size,
            },
            credentials: overrides.credentials,
            ssl_verify: parse_ssl_verify(overrides.ssl_verify.as_deref()),
        },
        retrieval: RetrievalConfig {
            top_k: parsed.retrieval.top_k,
            prompts_dir: PathBuf::from(parsed.retrieval.prompts_dir),
        },
        sessions: SessionConfig {
            idle_timeout: Duration::from_secs(parsed.sessions.idle_timeout_seconds),
        },
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

#[cfg(test)]
impl Config {
    /// Offline config: dummy provider, no credentials, no network.
    pub fn test_default(knowledge_base: &Path) -> Self {
        Self {
            app_name: "test".into(),
            log_level: "info".into(),
            knowledge_base: knowledge_base.to_path_buf(),
            http: HttpConfig { bind: "127.0.0.1:0".into() },
            llm: LlmConfig {
                provider: "dummy".into(),
                azure: AzureConfig {
                    api_version: default_api_version(),
                    chat_deployment: "test-chat".into(),
                    embedding_deployment: "test-embed".into(),
                    temperature: None,
                    timeout_seconds: 1,
                    embedding_batch_size: 8,
                },
                credentials: AzureCredentials::default(),
                ssl_verify: false,
            },
            retrieval: RetrievalConfig {
                top_k: default_top_k(),
                prompts_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/prompts"),
            },
            sessions: SessionConfig { idle_timeout: Duration::from_secs(default_idle_timeout_seconds()) },
        }
    }
}
