use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::LlmError;

const GROQ_CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Configuration for the LLM completion client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl LlmConfig {
    /// Fixed model and sampling parameters: deterministic, capped-length replies.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 400,
            temperature: 0.0,
        }
    }
}

/// Trait for LLM providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a single-turn completion from a prompt.
    async fn generate_completion(&self, prompt: String) -> Result<String, LlmError>;
}

/// Groq chat completion request/response structures (OpenAI-compatible).
#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
    usage: Option<GroqUsage>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
}

#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Groq provider implementation.
pub struct GroqProvider {
    config: LlmConfig,
    client: Client,
}

impl GroqProvider {
    // No explicit timeout here: the completion call blocks until the
    // provider answers, and it is the dominant latency source.
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn call_groq(&self, request: &GroqRequest) -> Result<GroqResponse, LlmError> {
        let response = self
            .client
            .post(GROQ_CHAT_COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();

        if status == 429 {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json::<GroqResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn generate_completion(&self, prompt: String) -> Result<String, LlmError> {
        info!(
            "Generating LLM completion (model: {}, max_tokens: {})",
            self.config.model, self.config.max_tokens
        );

        let request = GroqRequest {
            model: self.config.model.clone(),
            messages: vec![GroqMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self.call_groq(&request).await?;

        let content = response
            .choices
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?
            .message
            .content
            .trim()
            .to_string();

        if let Some(usage) = response.usage {
            info!(
                "LLM completion generated. Tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(content)
    }
}
