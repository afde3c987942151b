//! Conversational retrieval chain.
//!
//! ```text
//! question + history ──condense──▶ standalone question
//!                                  │ embed + search (top_k)
//!                                  ▼
//!          knowledge_qa(system: context) + user: standalone ──▶ answer
//! ```
//!
//! The condense step only runs when there is prior history.

use tracing::debug;

use crate::llm::{ChatMessage, LlmProvider, ProviderError};
use crate::prompt::Prompts;

use super::VectorIndex;

/// Answer text plus the knowledge documents it was conditioned on.
#[derive(Debug, Clone)]
pub struct RagAnswer {
    pub answer: String,
    pub source_documents: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RetrievalChain {
    provider: LlmProvider,
    index: VectorIndex,
    prompts: Prompts,
    top_k: usize,
}

impl RetrievalChain {
    pub fn new(provider: LlmProvider, index: VectorIndex, prompts: Prompts, top_k: usize) -> Self {
        Self { provider, index, prompts, top_k }
    }

    pub async fn ask(&self, question: &str, history: &[(String, String)]) -> Result<RagAnswer, ProviderError> {
        let standalone = if history.is_empty() {
            question.to_string()
        } else {
            let prompt = self
                .prompts
                .condense_question(&render_history(history), question);
            let rewritten = self
                .provider
                .chat(&[ChatMessage::user(prompt)], &[])
                .await?
                .into_text()?;
            debug!(original = %question, standalone = %rewritten, "condensed follow-up question");
            rewritten
        };

        let query = self
            .provider
            .embed(std::slice::from_ref(&standalone))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Response("empty embedding response".into()))?;

        let source_documents: Vec<String> = self
            .index
            .search(&query, self.top_k)
            .into_iter()
            .map(|hit| hit.text)
            .collect();
        debug!(sources = source_documents.len(), "retrieved knowledge documents");

        let messages = [
            ChatMessage::system(self.prompts.knowledge_qa(&source_documents.join("\n\n"))),
            ChatMessage::user(standalone),
        ];
        let answer = self.provider.chat(&messages, &[]).await?.into_text()?;

        Ok(RagAnswer { answer, source_documents })
    }
}

/// `Human:` / `Assistant:` transcript used by the condense prompt.
pub fn render_history(history: &[(String, String)]) -> String {
    history
        .iter()
        .map(|(q, a)| format!("Human: {q}\nAssistant: {a}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::dummy::{DummyFailure, DummyProvider};

    async fn chain_with(provider: LlmProvider) -> RetrievalChain {
        let corpus = vec![
            "How to reset my password? Visit the password reset page and follow the instructions.".to_string(),
            "Printer issues: check paper jam, ensure toner is full, restart printer.".to_string(),
        ];
        let index = VectorIndex::build(&LlmProvider::Dummy(DummyProvider::default()), &corpus)
            .await
            .unwrap();
        RetrievalChain::new(provider, index, Prompts::default(), 1)
    }

    #[tokio::test]
    async fn first_question_is_used_verbatim() {
        let chain = chain_with(LlmProvider::Dummy(DummyProvider::default())).await;
        let rag = chain.ask("printer paper jam", &[]).await.unwrap();
        assert_eq!(rag.answer, "[echo] printer paper jam");
        assert_eq!(rag.source_documents.len(), 1);
        assert!(rag.source_documents[0].starts_with("Printer issues"));
    }

    #[tokio::test]
    async fn follow_up_is_condensed_first() {
        let chain = chain_with(LlmProvider::Dummy(DummyProvider::default())).await;
        let history = vec![("q1".to_string(), "a1".to_string())];
        let rag = chain.ask("and then?", &history).await.unwrap();
        // The dummy echoes the condense prompt, which then becomes the question.
        assert!(rag.answer.contains("Follow Up Input: and then?"));
        assert!(rag.answer.contains("Human: q1\nAssistant: a1"));
    }

    #[tokio::test]
    async fn chat_failure_propagates() {
        let chain = chain_with(LlmProvider::Dummy(DummyProvider::failing(DummyFailure::Chat))).await;
        assert!(chain.ask("anything", &[]).await.is_err());
    }

    #[test]
    fn history_rendering() {
        let h = vec![("a".to_string(), "b".to_string()), ("c".to_string(), "d".to_string())];
        assert_eq!(render_history(&h), "Human: a\nAssistant: b\nHuman: c\nAssistant: d");
        assert_eq!(render_history(&[]), "");
    }
}
