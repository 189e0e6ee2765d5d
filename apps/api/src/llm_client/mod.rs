/// LLM Client — the single point of entry for all text-oracle calls in cvscan.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Pipeline stages depend on the `TextOracle` trait, never on `LlmClient` itself.
///
/// Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod json_extract;
pub mod prompts;

use prompts::JSON_ONLY_SYSTEM;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all oracle calls in cvscan.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A best-effort text-completion service. Output may be wrong or malformed;
/// callers validate everything they read from it.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Sends one prompt and returns the raw completion text.
    /// Any non-success response, or a success with blank text, is an error.
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }

    /// Like `text`, but treats a missing or whitespace-only block as `EmptyContent`.
    fn into_text(self) -> Result<String, LlmError> {
        match self.text() {
            Some(t) if !t.trim().is_empty() => Ok(t.to_string()),
            _ => Err(LlmError::EmptyContent),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API implementation of `TextOracle`.
///
/// Makes exactly one request per call. Failed calls are never retried: each pipeline
/// stage must stay traceable to a single oracle interaction.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        temperature: f32,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: clamp_temperature(temperature),
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl TextOracle for LlmClient {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        self.call(prompt, JSON_ONLY_SYSTEM, temperature)
            .await?
            .into_text()
    }
}

/// The oracle boundary accepts temperatures in [0, 1] only. NaN collapses to 0.
fn clamp_temperature(temperature: f32) -> f32 {
    if temperature.is_nan() {
        0.0
    } else {
        temperature.clamp(0.0, 1.0)
    }
}
