use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::analysis::cost::PricingTable;

/// Which remote completion service backs the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
    /// Canned local responses; no credential needed.
    Fake,
}

impl LlmProvider {
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Anthropic => "claude-sonnet-4-5",
            Self::Fake => "fake-model",
        }
    }

    fn api_key_var(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Fake => None,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "fake" => Ok(Self::Fake),
            other => bail!("Unknown LLM_PROVIDER '{other}' (expected openai, anthropic or fake)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: LlmProvider,
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub price_per_1k: f64,
    pub timeout: Duration,
    pub uploads_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    /// Fails when the credential for the selected provider is missing.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider: LlmProvider = get("LLM_PROVIDER")
            .unwrap_or_else(|| "openai".to_string())
            .parse()?;

        let api_key = match provider.api_key_var() {
            Some(var) => get(var)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{var}' is not set"))?,
            None => String::new(),
        };

        let model = get("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());

        let price_per_1k = match get("LLM_PRICE_PER_1K") {
            Some(raw) => {
                let price = raw
                    .parse::<f64>()
                    .context("LLM_PRICE_PER_1K must be a number")?;
                if !price.is_finite() || price < 0.0 {
                    bail!("LLM_PRICE_PER_1K must be a non-negative number");
                }
                price
            }
            None => PricingTable::default().price_per_1k(&model),
        };

        let timeout_secs = get("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|| "120".to_string())
            .parse::<u64>()
            .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            provider,
            api_key,
            model,
            base_url: get("LLM_BASE_URL"),
            price_per_1k,
            timeout: Duration::from_secs(timeout_secs),
            uploads_dir: PathBuf::from(get("UPLOADS_DIR").unwrap_or_else(|| "uploads".to_string())),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
