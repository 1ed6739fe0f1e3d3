//! Rendering of an `AnalysisResult` for people and files.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::analysis::models::AnalysisResult;

/// Pretty-printed JSON with 2-space indentation.
pub fn to_pretty_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize analysis result")
}

/// Human-readable block printed by the CLI and shown on the results page.
pub fn format_summary(result: &AnalysisResult) -> String {
    let (tokens, usd) = match &result.cost_estimate {
        Some(cost) => (cost.total_tokens.to_string(), format!("{}", cost.usd)),
        None => ("N/A".to_string(), "N/A".to_string()),
    };

    format!(
        "\n=== Resume Analysis Summary ===\n\
         Matching Score: {}/100\n\
         \nMatched Skills: {}\n\
         Missing Skills: {}\n\
         \nMatched Experience: {}\n\
         Missing Experience: {}\n\
         \nSummary: {}\n\
         \nToken Usage: {tokens} (Cost: ${usd})\n",
        result.matching_score,
        join_or_none(&result.matched_skills),
        join_or_none(&result.missing_skills),
        join_or_none(&result.matched_experience),
        join_or_none(&result.missing_experience),
        result.summary,
    )
}

/// Writes the JSON result as UTF-8, replacing any existing file.
///
/// The bytes go to a temp file in the same directory which is then renamed
/// over `path`, so a failure never leaves a truncated file behind.
pub fn save_json(result: &AnalysisResult, path: &Path) -> Result<()> {
    let json = to_pretty_json(result)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Cannot create temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .context("Failed to write analysis result")?;
    tmp.as_file().sync_all().context("Failed to flush analysis result")?;
    tmp.persist(path)
        .with_context(|| format!("Cannot write {}", path.display()))?;

    info!("Result saved to {}", path.display());
    Ok(())
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}
