//! Model gateway for the Orbit coach
//!
//! Provides completion requests against the Gemini API behind a small
//! client trait, so the coach and REPL stay provider-agnostic.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{CompletionRequest, CompletionResponse, FinishReason, Message, Role, StreamChunk, TokenUsage};

use crate::config::LlmConfig;

/// Create a model client based on the provider specified in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = config.provider, model = config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown model provider: '{}'. Supported: gemini",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    #[test]
    fn test_create_client_rejects_unknown_provider() {
        let config = LlmConfig {
            provider: "delphi".to_string(),
            ..LlmConfig::default()
        };

        let err = create_client(&config).err().unwrap();
        assert!(err.to_string().contains("delphi"));
    }
}
