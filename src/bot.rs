//! One-shot bot initialization and the shared runtime state.
//!
//! Startup builds every delegate (knowledge base, provider, vector index,
//! retrieval chain, function caller). A failure is recorded, not retried: the
//! web surface keeps serving and reports the bot as unavailable.

use serde::Serialize;
use tracing::{error, info};

use crate::config::Config;
use crate::knowledge::KnowledgeBase;
use crate::llm::{LlmProvider, ProviderError, providers};
use crate::orchestrator::{FunctionCaller, Orchestrator};
use crate::prompt::Prompts;
use crate::retrieval::{RetrievalChain, VectorIndex};
use crate::session::SessionStore;

/// Shown in place of the chat when initialization failed.
pub const NOT_READY_WARNING: &str = "⏳ Please wait for the chatbot to initialize...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BotStatus {
    Ready {
        documents_count: usize,
        categories: Vec<String>,
        knowledge_fallback: bool,
    },
    Failed {
        error: String,
    },
}

pub struct Bot {
    pub app_name: String,
    status: BotStatus,
    orchestrator: Option<Orchestrator>,
    pub sessions: SessionStore,
}

impl Bot {
    /// Initialize from config with the provider it names.
    pub async fn initialize(config: &Config) -> Self {
        match providers::build(&config.llm) {
            Ok(provider) => Self::initialize_with(config, provider).await,
            Err(e) => Self::failed(config, e),
        }
    }

    /// Initialize with an already-built provider.
    pub async fn initialize_with(config: &Config, provider: LlmProvider) -> Self {
        let knowledge = KnowledgeBase::load(&config.knowledge_base);

        let index = match VectorIndex::build(&provider, knowledge.documents()).await {
            Ok(index) => index,
            Err(e) => return Self::failed(config, e),
        };

        let prompts = Prompts::load(&config.retrieval.prompts_dir);
        let chain = RetrievalChain::new(provider.clone(), index, prompts.clone(), config.retrieval.top_k);
        let functions = FunctionCaller::new(provider, &prompts);

        let status = BotStatus::Ready {
            documents_count: knowledge.documents().len(),
            categories: knowledge.categories(),
            knowledge_fallback: knowledge.is_fallback(),
        };
        info!(?status, "✅ chatbot initialized");

        Self {
            app_name: config.app_name.clone(),
            status,
            orchestrator: Some(Orchestrator::new(chain, functions)),
            sessions: SessionStore::new(config.sessions.idle_timeout),
        }
    }

    fn failed(config: &Config, e: ProviderError) -> Self {
        error!(error = %e, "❌ failed to initialize chatbot");
        Self {
            app_name: config.app_name.clone(),
            status: BotStatus::Failed { error: format!("Failed to initialize chatbot: {e}") },
            orchestrator: None,
            sessions: SessionStore::new(config.sessions.idle_timeout),
        }
    }

    pub fn status(&self) -> &BotStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.orchestrator.is_some()
    }

    /// `None` until initialization has succeeded.
    pub fn orchestrator(&self) -> Option<&Orchestrator> {
        self.orchestrator.as_ref()
    }
}
