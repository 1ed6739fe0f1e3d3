//! OpenAI Chat Completions backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{api_error_message, Completion, CompletionBackend, LlmError, TEMPERATURE};
use crate::errors::AnalysisError;

const OPENAI_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiBackend {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
        })
    }

    /// Points the backend at a compatible endpoint (proxy, gateway, local stub).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn call(&self, system: &str, prompt: &str, model: &str) -> Result<Completion, LlmError> {
        let request_body = ChatRequest {
            model,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
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

        let chat: ChatResponse = response.json().await?;
        let text = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;

        Ok(Completion {
            text,
            prompt_tokens: chat.usage.prompt_tokens,
            completion_tokens: chat.usage.completion_tokens,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        model: &str,
    ) -> Result<Completion, AnalysisError> {
        match self.call(system, prompt, model).await {
            Ok(completion) => {
                debug!(
                    "OpenAI call succeeded: prompt_tokens={}, completion_tokens={}",
                    completion.prompt_tokens, completion.completion_tokens
                );
                Ok(completion)
            }
            Err(e) => {
                warn!("OpenAI call failed: {e}");
                Err(e.into())
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
