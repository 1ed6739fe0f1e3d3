//! Anthropic Messages API backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{api_error_message, Completion, CompletionBackend, LlmError, TEMPERATURE};
use crate::errors::AnalysisError;

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

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
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

impl AnthropicResponse {
    /// Text of the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct AnthropicBackend {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicBackend {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: ANTHROPIC_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn call(&self, system: &str, prompt: &str, model: &str) -> Result<Completion, LlmError> {
        let request_body = AnthropicRequest {
            model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let parsed: AnthropicResponse = response.json().await?;
        let text = parsed
            .text()
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?
            .to_string();

        Ok(Completion {
            text,
            prompt_tokens: parsed.usage.input_tokens,
            completion_tokens: parsed.usage.output_tokens,
        })
    }
}

#[async_trait]
impl CompletionBackend for AnthropicBackend {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        model: &str,
    ) -> Result<Completion, AnalysisError> {
        match self.call(system, prompt, model).await {
            Ok(completion) => {
                debug!(
                    "Anthropic call succeeded: input_tokens={}, output_tokens={}",
                    completion.prompt_tokens, completion.completion_tokens
                );
                Ok(completion)
            }
            Err(e) => {
                warn!("Anthropic call failed: {e}");
                Err(e.into())
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}
