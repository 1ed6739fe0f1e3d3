//! Fake completion backend for tests and offline demos.
//!
//! Returns a canned response. Token counts are whitespace-separated word
//! counts, which keeps them deterministic and non-zero for non-empty text.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{Completion, CompletionBackend};
use crate::errors::AnalysisError;

const SAMPLE_RESPONSE: &str = r#"{"matching_score": 75, "matched_skills": ["Communication"], "missing_skills": [], "matched_experience": [], "missing_experience": [], "summary": "Offline sample analysis; no model was called."}"#;

#[derive(Debug)]
pub struct FakeBackend {
    response: Result<String, String>,
    last_prompt: Mutex<Option<String>>,
}

impl FakeBackend {
    pub fn with_response(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn with_sample_response() -> Self {
        Self::with_response(SAMPLE_RESPONSE)
    }

    /// Every call fails with `ServiceFailure(message)`.
    #[cfg(test)]
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            last_prompt: Mutex::new(None),
        }
    }

    /// The user prompt of the most recent call.
    #[cfg(test)]
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

#[async_trait]
impl CompletionBackend for FakeBackend {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        _model: &str,
    ) -> Result<Completion, AnalysisError> {
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        match &self.response {
            Ok(text) => Ok(Completion {
                text: text.clone(),
                prompt_tokens: word_count(system) + word_count(prompt),
                completion_tokens: word_count(text),
            }),
            Err(message) => Err(AnalysisError::ServiceFailure(message.clone())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_words_and_records_prompt() {
        let backend = FakeBackend::with_response("one two three");
        let completion = backend.complete("be brief", "hello there", "m").await.unwrap();
        assert_eq!(completion.text, "one two three");
        assert_eq!(completion.prompt_tokens, 4);
        assert_eq!(completion.completion_tokens, 3);
        assert_eq!(backend.last_prompt().as_deref(), Some("hello there"));
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = FakeBackend::failing("quota exceeded");
        let err = backend.complete("s", "p", "m").await.unwrap_err();
        assert_eq!(err, AnalysisError::ServiceFailure("quota exceeded".to_string()));
    }
}
