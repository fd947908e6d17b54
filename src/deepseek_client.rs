//! DeepSeek Client
//!
//! LLM client implementation for the DeepSeek chat-completions API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::LlmError;
use crate::llm_client::{CompletionRequest, LlmClient};

/// Default DeepSeek model
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default chat-completions endpoint
pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";

/// DeepSeek API client
#[derive(Clone)]
pub struct DeepSeekClient {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
    model: String,
}

impl std::fmt::Debug for DeepSeekClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepSeekClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl DeepSeekClient {
    /// Create a client whose HTTP requests give up after `timeout`
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            client,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    /// Build from configuration; `None` when no API key is configured
    pub fn from_config(config: &SearchConfig) -> Result<Option<Self>, LlmError> {
        let Some(api_key) = config.api_key.clone().filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        Ok(Some(
            Self::new(api_key, config.ai_timeout)?
                .with_model(&config.model)
                .with_api_url(&config.api_url),
        ))
    }

    async fn call_api(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": [
                {"role": "user", "content": &request.prompt}
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let response_text = response.text().await?;
        extract_content(&response_text)
    }
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

/// Pull `choices[0].message.content` out of a chat-completions body
fn extract_content(response_text: &str) -> Result<String, LlmError> {
    let api_response: ApiResponse =
        serde_json::from_str(response_text).map_err(|e| LlmError::Decode(e.to_string()))?;

    api_response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .ok_or(LlmError::EmptyResponse)
}

#[async_trait]
impl LlmClient for DeepSeekClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.call_api(request).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "DeepSeek"
    }
}
