//! In-memory similarity index over the knowledge documents, and the
//! conversational retrieval chain built on it.

pub mod chain;

pub use chain::{RagAnswer, RetrievalChain};

use tracing::{debug, info};

use crate::llm::{LlmProvider, ProviderError};

/// Flat cosine-similarity index. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    documents: Vec<String>,
    /// Unit-length vectors, parallel to `documents`. Zero vectors stay zero.
    vectors: Vec<Vec<f32>>,
}

/// One search result.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub text: String,
    pub score: f32,
}

impl VectorIndex {
    /// Embed every document through `provider` and index the results.
    pub async fn build(provider: &LlmProvider, documents: &[String]) -> Result<Self, ProviderError> {
        let vectors = provider.embed(documents).await?;
        if vectors.len() != documents.len() {
            return Err(ProviderError::Response(format!(
                "embedded {} of {} documents",
                vectors.len(),
                documents.len()
            )));
        }
        let index = Self::from_vectors(documents.to_vec(), vectors)?;
        info!(documents = index.len(), provider = provider.name(), "vector index built");
        Ok(index)
    }

    /// Index precomputed vectors. All vectors must share one dimension.
    pub fn from_vectors(documents: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self, ProviderError> {
        if let Some(dim) = vectors.first().map(Vec::len) {
            if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
                return Err(ProviderError::Response(format!(
                    "inconsistent embedding dimension: {} vs {dim}",
                    bad.len()
                )));
            }
        }
        Ok(Self {
            documents,
            vectors: vectors.into_iter().map(normalize).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The `k` most similar documents, best first. Ties keep corpus order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredDocument> {
        let query = normalize(query.to_vec());
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(&query, v)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        debug!(hits = scored.len(), k, "vector search");
        scored
            .into_iter()
            .map(|(i, score)| ScoredDocument { text: self.documents[i].clone(), score })
            .collect()
    }
}

fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
