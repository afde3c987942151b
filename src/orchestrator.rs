//! Per-turn answer orchestration.
//!
//! Each user turn runs two sequential delegate calls:
//!
//! 1. the retrieval chain answers from the knowledge base;
//! 2. a function-calling chat pass that may invoke `check_system_status`.
//!
//! Both answers are combined into one reply. Any failure aborts the turn and
//! leaves the session history untouched.

use chrono::Local;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::devices::{STATUS_TOOL_NAME, check_system_status, status_tool};
use crate::llm::{ChatMessage, LlmProvider, ProviderError};
use crate::prompt::Prompts;
use crate::retrieval::RetrievalChain;
use crate::session::{ChatTurn, Session};

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("knowledge retrieval failed: {0}")]
    Retrieval(#[source] ProviderError),
    #[error("function calling failed: {0}")]
    FunctionCall(#[source] ProviderError),
    #[error("invalid tool arguments: {0}")]
    ToolArguments(String),
}

/// Outcome of the function-calling pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionAnswer {
    /// The model invoked the status tool; carries the looked-up status.
    Status(String),
    /// The model replied in free text.
    Info(String),
}

impl FunctionAnswer {
    pub fn text(&self) -> &str {
        match self {
            FunctionAnswer::Status(s) | FunctionAnswer::Info(s) => s,
        }
    }
}

#[derive(Deserialize)]
struct StatusArgs {
    device_id: String,
}

/// Chat pass with the device-status tool registered.
#[derive(Debug, Clone)]
pub struct FunctionCaller {
    provider: LlmProvider,
    system_prompt: String,
    tools: Vec<Value>,
}

impl FunctionCaller {
    pub fn new(provider: LlmProvider, prompts: &Prompts) -> Self {
        Self {
            provider,
            system_prompt: prompts.support_assistant().to_string(),
            tools: vec![status_tool()],
        }
    }

    pub async fn run(&self, utterance: &str, history: &[(String, String)]) -> Result<FunctionAnswer, TurnError> {
        let mut messages = Vec::with_capacity(history.len() * 2 + 2);
        messages.push(ChatMessage::system(self.system_prompt.as_str()));
        for (question, answer) in history {
            messages.push(ChatMessage::user(question.as_str()));
            messages.push(ChatMessage::assistant(answer.as_str()));
        }
        messages.push(ChatMessage::user(utterance));

        let reply = self
            .provider
            .chat(&messages, &self.tools)
            .await
            .map_err(TurnError::FunctionCall)?;

        if let Some(call) = reply.tool_calls.first() {
            if call.name == STATUS_TOOL_NAME {
                let args: StatusArgs = serde_json::from_str(&call.arguments)
                    .map_err(|e| TurnError::ToolArguments(format!("{}: {e}", call.name)))?;
                let status = check_system_status(&args.device_id);
                info!(device_id = %args.device_id, %status, "device status tool invoked");
                return Ok(FunctionAnswer::Status(status.to_string()));
            }
            warn!(tool = %call.name, "model requested an unregistered tool, using reply text");
        }

        Ok(FunctionAnswer::Info(reply.content.unwrap_or_default()))
    }
}

/// Join the knowledge answer and the function-pass answer.
pub fn combine_answers(knowledge: &str, function: &FunctionAnswer) -> String {
    match function {
        FunctionAnswer::Status(s) => format!("📚 {knowledge}\n\n🔧 *System Status:  {s}"),
        FunctionAnswer::Info(s) => format!("📚 {knowledge}\n\n💡 *Additional Info:  {s}"),
    }
}

#[derive(Debug, Clone)]
pub struct Orchestrator {
    chain: RetrievalChain,
    functions: FunctionCaller,
}

impl Orchestrator {
    pub fn new(chain: RetrievalChain, functions: FunctionCaller) -> Self {
        Self { chain, functions }
    }

    /// Produce the combined answer for `utterance` given prior turns.
    pub async fn answer(&self, utterance: &str, history: &[(String, String)]) -> Result<String, TurnError> {
        let rag = self
            .chain
            .ask(utterance, history)
            .await
            .map_err(TurnError::Retrieval)?;
        debug!(sources = ?rag.source_documents, "knowledge answer ready");

        let function = self.functions.run(utterance, history).await?;
        Ok(combine_answers(&rag.answer, &function))
    }

    /// Answer `utterance` in `session` and record the turn on success only.
    pub async fn process_turn(&self, session: &mut Session, utterance: &str) -> Result<ChatTurn, TurnError> {
        let submitted = Local::now();
        let answer = self.answer(utterance, &session.history_pairs()).await?;
        let turn = ChatTurn::new(utterance, answer, submitted);
        session.push_turn(turn.clone());
        info!(session_id = %session.id(), turns = session.turns().len(), "turn recorded");
        Ok(turn)
    }
}
