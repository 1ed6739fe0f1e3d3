//! Runs one résumé/job comparison end to end.
//!
//! Stages: build prompt → complete → validate → attach cost. The first
//! failing stage short-circuits the rest; nothing is retried.
//!
//! The analyzer holds only immutable configuration, so one instance can
//! serve any number of concurrent `analyze` calls.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use crate::analysis::cost::attach_cost;
use crate::analysis::models::AnalysisResult;
use crate::analysis::prompts::{analysis_system_prompt, build_prompt};
use crate::analysis::validator::validate;
use crate::config::Config;
use crate::errors::{AnalysisError, AppError};
use crate::ingestion::{ingest, CleanText};
use crate::llm_client::{create_backend, CompletionBackend, LlmError};

#[derive(Debug, Clone)]
pub struct Analyzer {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    price_per_1k: f64,
}

impl Analyzer {
    pub fn new(backend: Arc<dyn CompletionBackend>, model: String, price_per_1k: f64) -> Self {
        Self {
            backend,
            model,
            price_per_1k,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Ok(Self::new(
            create_backend(config)?,
            config.model.clone(),
            config.price_per_1k,
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &'static str {
        self.backend.provider_name()
    }

    pub async fn analyze(
        &self,
        job: &CleanText,
        resume: &CleanText,
    ) -> Result<AnalysisResult, AnalysisError> {
        let span = info_span!("analyze", provider = self.provider_name(), model = %self.model);
        self.run(job, resume).instrument(span).await
    }

    /// Ingests both files on a blocking thread, then analyzes them.
    /// Entry point for the CLI and the web form.
    pub async fn analyze_files(
        &self,
        job_path: PathBuf,
        resume_path: PathBuf,
    ) -> Result<AnalysisResult, AppError> {
        let (job, resume) = tokio::task::spawn_blocking(move || {
            info!("Extracting and sanitizing job description...");
            let job = ingest(&job_path)?;
            info!("Extracting and sanitizing candidate resume...");
            let resume = ingest(&resume_path)?;
            Ok::<_, AppError>((job, resume))
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("ingestion task failed: {e}")))??;

        Ok(self.analyze(&job, &resume).await?)
    }

    async fn run(
        &self,
        job: &CleanText,
        resume: &CleanText,
    ) -> Result<AnalysisResult, AnalysisError> {
        let system = analysis_system_prompt();
        let prompt = build_prompt(job, resume);

        info!("Requesting comparison from LLM");
        let completion = self.backend.complete(&system, &prompt, &self.model).await?;

        // Counts reflect what was exchanged, whether or not validation passes.
        info!(
            "Prompt tokens: {}, Completion tokens: {}, Total: {}",
            completion.prompt_tokens,
            completion.completion_tokens,
            completion.prompt_tokens + completion.completion_tokens
        );

        let result = validate(&completion.text)?;
        let result = attach_cost(
            result,
            completion.prompt_tokens,
            completion.completion_tokens,
            self.price_per_1k,
        );

        info!("Analysis complete: matching_score={}", result.matching_score);
        Ok(result)
    }
}
