//! Prompt templates for the retrieval chain and the function-calling pass.
//!
//! Templates are plain text files under `config/prompts/`. Variables use
//! `{{key}}` syntax and are substituted once at
//! [`build()`](PromptBuilder::build) time. A missing file falls back to the
//! built-in text so the bot still starts from any working directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const SEPARATOR: &str = "\n\n";

pub const CONDENSE_QUESTION_FILE: &str = "condense_question.txt";
pub const KNOWLEDGE_QA_FILE: &str = "knowledge_qa.txt";
pub const SUPPORT_ASSISTANT_FILE: &str = "support_assistant.txt";

const DEFAULT_CONDENSE_QUESTION: &str = "Given the following conversation and a follow up question, \
rephrase the follow up question to be a standalone question, in its original language.

Chat History:
{{chat_history}}
Follow Up Input: {{question}}
Standalone question:";

const DEFAULT_KNOWLEDGE_QA: &str = "Use the following pieces of context to answer the user's question.
If you don't know the answer, just say that you don't know, don't try to make up an answer.
----------------
{{context}}";

const DEFAULT_SUPPORT_ASSISTANT: &str = "You are a helpful IT support assistant.";

/// Fluent builder that joins template fragments and substitutes variables.
pub struct PromptBuilder {
    prompts_dir: PathBuf,
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
            parts: Vec::new(),
            vars: HashMap::new(),
        }
    }

    /// Append the contents of `filename` from the prompts directory.
    /// Silently skips the layer when the file does not exist or is blank.
    pub fn layer(mut self, filename: &str) -> Self {
        let path = self.prompts_dir.join(filename);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let trimmed = text.trim().to_string();
                if !trimmed.is_empty() {
                    self.parts.push(trimmed);
                }
            }
            Err(_) => {
                tracing::debug!("prompt: layer '{}' not found, skipped", path.display());
            }
        }
        self
    }

    /// Directly append a text fragment.
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim().to_string();
        if !trimmed.is_empty() {
            self.parts.push(trimmed);
        }
        self
    }

    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Join all layers with blank lines and apply variable substitution.
    ///
    /// Substitution is a single left-to-right pass: inserted values are never
    /// rescanned, and unknown `{{keys}}` are left as written.
    pub fn build(self) -> String {
        let template = self.parts.join(SEPARATOR);
        let mut prompt = String::with_capacity(template.len());
        let mut rest = template.as_str();
        while let Some(start) = rest.find("{{") {
            prompt.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}").and_then(|end| self.vars.get(&after[..end]).map(|v| (end, v))) {
                Some((end, value)) => {
                    prompt.push_str(value);
                    rest = &after[end + 2..];
                }
                None => {
                    prompt.push_str("{{");
                    rest = after;
                }
            }
        }
        prompt.push_str(rest);
        prompt
    }
}

/// The three templates the bot uses, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Prompts {
    condense_question: String,
    knowledge_qa: String,
    support_assistant: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            condense_question: DEFAULT_CONDENSE_QUESTION.to_string(),
            knowledge_qa: DEFAULT_KNOWLEDGE_QA.to_string(),
            support_assistant: DEFAULT_SUPPORT_ASSISTANT.to_string(),
        }
    }
}

impl Prompts {
    pub fn load(prompts_dir: &Path) -> Self {
        Self {
            condense_question: template(prompts_dir, CONDENSE_QUESTION_FILE, DEFAULT_CONDENSE_QUESTION),
            knowledge_qa: template(prompts_dir, KNOWLEDGE_QA_FILE, DEFAULT_KNOWLEDGE_QA),
            support_assistant: template(prompts_dir, SUPPORT_ASSISTANT_FILE, DEFAULT_SUPPORT_ASSISTANT),
        }
    }

    /// Prompt asking the model to rewrite `question` as a standalone question.
    pub fn condense_question(&self, chat_history: &str, question: &str) -> String {
        PromptBuilder::new("")
            .append(self.condense_question.as_str())
            .var("chat_history", chat_history)
            .var("question", question)
            .build()
    }

    /// System prompt carrying the retrieved knowledge documents.
    pub fn knowledge_qa(&self, context: &str) -> String {
        PromptBuilder::new("")
            .append(self.knowledge_qa.as_str())
            .var("context", context)
            .build()
    }

    pub fn support_assistant(&self) -> &str {
        &self.support_assistant
    }
}

fn template(prompts_dir: &Path, filename: &str, default: &str) -> String {
    let builder = PromptBuilder::new(prompts_dir).layer(filename);
    if builder.is_empty() {
        default.to_string()
    } else {
        builder.build()
    }
}
