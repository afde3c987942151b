//! LLM provider implementations.
//!
//! `build(config)` is the factory, called once during bot initialization.

pub mod azure_openai;
pub mod dummy;

use crate::config::LlmConfig;
use crate::llm::{LlmProvider, ProviderError};

/// Construct the configured provider.
pub fn build(config: &LlmConfig) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider::default())),
        "azure" | "azure-openai" => Ok(LlmProvider::Azure(azure_openai::AzureOpenAiProvider::new(config)?)),
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::Path;

    #[test]
    fn builds_dummy() {
        let cfg = Config::test_default(Path::new("kb.csv"));
        assert_eq!(build(&cfg.llm).unwrap().name(), "dummy");
    }

    #[test]
    fn unknown_provider_errors() {
        let mut cfg = Config::test_default(Path::new("kb.csv"));
        cfg.llm.provider = "mystery".into();
        assert!(matches!(build(&cfg.llm), Err(ProviderError::UnknownProvider(p)) if p == "mystery"));
    }

    #[test]
    fn azure_without_credentials_errors() {
        let mut cfg = Config::test_default(Path::new("kb.csv"));
        cfg.llm.provider = "azure".into();
        assert!(matches!(build(&cfg.llm), Err(ProviderError::Config(_))));
    }
}
