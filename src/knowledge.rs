//! Helpdesk knowledge base: question/solution rows loaded from CSV.
//!
//! Loading never fails: an unreadable or malformed file is logged and
//! replaced by a fixed four-entry fallback so startup can continue.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// One question/solution record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub category: String,
    pub question: String,
    pub solution: String,
}

impl KnowledgeEntry {
    /// Flattened text used as the similarity-search document.
    pub fn document(&self) -> String {
        format!("{} {}", self.question, self.solution)
    }
}

/// Where the loaded entries came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeSource {
    File(PathBuf),
    /// The file could not be used; carries the reason.
    Fallback(String),
}

#[derive(Debug, Error)]
pub enum KnowledgeLoadError {
    #[error("cannot read knowledge base: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed knowledge base: {0}")]
    Csv(#[from] csv::Error),
    #[error("knowledge base is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("knowledge base has no entries")]
    Empty,
}

const REQUIRED_COLUMNS: [&str; 3] = ["category", "question", "solution"];

/// Loaded entries plus the flattened documents derived from them.
///
/// `documents[i]` always corresponds to `entries[i]`, except for the fallback
/// corpus whose documents keep their hand-written phrasing.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    documents: Vec<String>,
    source: KnowledgeSource,
}

const FALLBACK_DOCUMENTS: [&str; 4] = [
    "How to reset my password? Visit the password reset page and follow the instructions.",
    "My computer is slow. Restart, close apps, run antivirus scan.",
    "Connect to VPN by installing client from IT portal and login.",
    "Printer issues: check paper jam, ensure toner is full, restart printer.",
];

const FALLBACK_ENTRIES: [(&str, &str, &str); 4] = [
    ("Password", "How to reset my password?", "Visit the password reset page and follow the instructions."),
    ("Performance", "My computer is slow", "Restart, close apps, run antivirus scan."),
    ("Network", "Connect to VPN", "Install client from IT portal and login."),
    ("Hardware", "Printer issues", "Check paper jam, ensure toner is full, restart printer."),
];

impl KnowledgeBase {
    /// Load `path`, substituting the fallback corpus on any failure.
    pub fn load(path: &Path) -> Self {
        let loaded = File::open(path)
            .map_err(KnowledgeLoadError::Io)
            .and_then(Self::parse);

        match loaded {
            Ok(entries) => {
                info!(path = %path.display(), entries = entries.len(), "knowledge base loaded");
                Self::from_entries(entries, KnowledgeSource::File(path.to_path_buf()))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "knowledge base unavailable, using fallback");
                Self::fallback(e.to_string())
            }
        }
    }

    /// Parse CSV from any reader. Used directly by tests; `load` wraps it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, KnowledgeLoadError> {
        let entries = Self::parse(reader)?;
        Ok(Self::from_entries(entries, KnowledgeSource::File(PathBuf::from("<reader>"))))
    }

    /// The fixed four-entry corpus.
    pub fn fallback(reason: impl Into<String>) -> Self {
        let entries = FALLBACK_ENTRIES
            .iter()
            .map(|(category, question, solution)| KnowledgeEntry {
                category: category.to_string(),
                question: question.to_string(),
                solution: solution.to_string(),
            })
            .collect();
        Self {
            entries,
            documents: FALLBACK_DOCUMENTS.iter().map(|d| d.to_string()).collect(),
            source: KnowledgeSource::Fallback(reason.into()),
        }
    }

    fn parse<R: Read>(reader: R) -> Result<Vec<KnowledgeEntry>, KnowledgeLoadError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers()?;
        if let Some(missing) = REQUIRED_COLUMNS.into_iter().find(|c| !headers.iter().any(|h| h == *c)) {
            return Err(KnowledgeLoadError::MissingColumn(missing));
        }

        let entries = rdr.deserialize::<KnowledgeEntry>().collect::<Result<Vec<_>, _>>()?;
        if entries.is_empty() {
            return Err(KnowledgeLoadError::Empty);
        }
        Ok(entries)
    }

    fn from_entries(entries: Vec<KnowledgeEntry>, source: KnowledgeSource) -> Self {
        let documents = entries.iter().map(KnowledgeEntry::document).collect();
        Self { entries, documents, source }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn source(&self) -> &KnowledgeSource {
        &self.source
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, KnowledgeSource::Fallback(_))
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !out.iter().any(|c| c == &entry.category) {
                out.push(entry.category.clone());
            }
        }
        out
    }
}
