//! LLM Client: the single point of entry for remote completion calls.
//!
//! No other module talks to a provider API directly. Each call is a single
//! attempt: no retries, no streaming, fixed low temperature.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, LlmProvider};
use crate::errors::AnalysisError;

pub mod anthropic;
pub mod fake;
pub mod openai;
pub mod prompts;

pub use anthropic::AnthropicBackend;
pub use fake::FakeBackend;
pub use openai::OpenAiBackend;

/// Output must be machine-parseable, so favour determinism.
pub const TEMPERATURE: f32 = 0.3;

/// Transport-level failures. Converted to `AnalysisError::ServiceFailure`
/// before crossing the adapter boundary.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(e)
        }
    }
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        AnalysisError::ServiceFailure(e.to_string())
    }
}

/// Raw model output plus the provider's token accounting for the call.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// A remote (or fake) completion service.
///
/// Implementations hold no per-call state and are safe to share across
/// concurrent analyses.
#[async_trait]
pub trait CompletionBackend: Send + Sync + fmt::Debug {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        model: &str,
    ) -> Result<Completion, AnalysisError>;

    /// e.g. "openai", "anthropic", "fake".
    fn provider_name(&self) -> &'static str;
}

/// Builds the backend selected by `LLM_PROVIDER`.
pub fn create_backend(config: &Config) -> Result<Arc<dyn CompletionBackend>, LlmError> {
    let backend: Arc<dyn CompletionBackend> = match config.provider {
        LlmProvider::OpenAi => {
            let mut b = OpenAiBackend::new(config.api_key.clone(), config.timeout)?;
            if let Some(url) = &config.base_url {
                b = b.with_base_url(url.clone());
            }
            Arc::new(b)
        }
        LlmProvider::Anthropic => {
            let mut b = AnthropicBackend::new(config.api_key.clone(), config.timeout)?;
            if let Some(url) = &config.base_url {
                b = b.with_base_url(url.clone());
            }
            Arc::new(b)
        }
        LlmProvider::Fake => Arc::new(FakeBackend::with_sample_response()),
    };
    Ok(backend)
}

/// Pulls `message` out of a provider error body, falling back to the raw body.
pub(crate) fn api_error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or(body)
}
