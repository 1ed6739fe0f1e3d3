use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures while turning an input file into clean text.
/// Always recoverable by supplying a different file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Unreadable(String),

    #[error("{0}")]
    Empty(String),

    #[error("{format} extraction error: {cause}")]
    ExtractionFailed { format: String, cause: String },
}

/// Failures while comparing two documents through the LLM.
/// Recoverable at the call level; never retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("LLM service failure: {0}")]
    ServiceFailure(String),

    #[error("LLM output validation failed: {0}")]
    MalformedOutput(String),
}

impl InputError {
    /// Category label shown next to the detail string by both front ends.
    pub fn label(&self) -> &'static str {
        "Input error"
    }
}

impl AnalysisError {
    pub fn label(&self) -> &'static str {
        "LLM analysis error"
    }
}

/// HTTP-facing error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Category label followed by the detail string, as shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Input(e) => format!("{}: {e}", e.label()),
            AppError::Analysis(e) => format!("{}: {e}", e.label()),
            AppError::Validation(msg) => msg.clone(),
            AppError::Internal(e) => format!("Unexpected error: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Input(_) => (StatusCode::BAD_REQUEST, "INPUT_ERROR", self.user_message()),
            AppError::Analysis(e) => {
                tracing::error!("Analysis error: {e}");
                (StatusCode::BAD_GATEWAY, "ANALYSIS_ERROR", self.user_message())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
