//! Shared fixtures for integration tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use helpdesk_bot::config::{
    AzureConfig, AzureCredentials, Config, HttpConfig, LlmConfig, RetrievalConfig, SessionConfig,
};

pub fn sample_kb() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/helpdesk_knowledge_base.csv")
}

/// Offline config: dummy provider, no credentials, no network.
pub fn test_config(knowledge_base: &Path) -> Config {
    Config {
        app_name: "test".into(),
        log_level: "info".into(),
        knowledge_base: knowledge_base.to_path_buf(),
        http: HttpConfig { bind: "127.0.0.1:0".into() },
        llm: LlmConfig {
            provider: "dummy".into(),
            azure: AzureConfig {
                api_version: "2024-02-01".into(),
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
            top_k: 4,
            prompts_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("config/prompts"),
        },
        sessions: SessionConfig { idle_timeout: Duration::from_secs(3600) },
    }
}
