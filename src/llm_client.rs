//! LLM Client Trait
//!
//! The text-completion collaborator behind the AI resolver. Kept as a trait
//! so the pipeline can run against a scripted client in tests.

use async_trait::async_trait;

use crate::error::LlmError;

/// Default output-token cap for intent extraction
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Default sampling temperature for intent extraction
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

/// A single-turn completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Opaque text-completion service
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the prompt as a user message and return the raw text response
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;

    /// Get the provider name for logging
    fn provider_name(&self) -> &str;
}
