//! Strict structural check of the model's raw response.
//!
//! Fails closed: malformed JSON, a non-object top level, a missing or
//! mistyped field, or an out-of-range score are all `MalformedOutput`.
//! No partial recovery or coercion.

use serde::Deserialize;
use tracing::warn;

use crate::analysis::models::AnalysisResult;
use crate::errors::AnalysisError;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Shape the model is asked to produce. Any `cost_estimate` it invents is
/// ignored along with other unknown fields.
#[derive(Debug, Deserialize)]
struct ModelOutput {
    matching_score: f64,
    matched_skills: Vec<String>,
    missing_skills: Vec<String>,
    matched_experience: Vec<String>,
    missing_experience: Vec<String>,
    summary: String,
}

/// Parses and validates a raw model response. The returned result has no
/// cost estimate yet.
pub fn validate(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let body = strip_code_fence(raw);

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| malformed(format!("response is not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(malformed("response is not a JSON object".to_string()));
    }

    let output: ModelOutput =
        serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;

    if !(MIN_SCORE..=MAX_SCORE).contains(&output.matching_score) {
        return Err(malformed(format!(
            "matching_score {} is outside [{MIN_SCORE}, {MAX_SCORE}]",
            output.matching_score
        )));
    }

    Ok(AnalysisResult {
        matching_score: output.matching_score,
        matched_skills: output.matched_skills,
        missing_skills: output.missing_skills,
        matched_experience: output.matched_experience,
        missing_experience: output.missing_experience,
        summary: output.summary,
        cost_estimate: None,
    })
}

/// Strips a ```` ``` ```` wrapper (with optional language tag) from either end.
fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

fn malformed(detail: String) -> AnalysisError {
    warn!("Rejected model output: {detail}");
    AnalysisError::MalformedOutput(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"matching_score": 90, "matched_skills": ["Python"], "missing_skills": [], "matched_experience": ["backend"], "missing_experience": [], "summary": "Strong match"}"#;

    fn assert_malformed(raw: &str) {
        assert!(
            matches!(validate(raw), Err(AnalysisError::MalformedOutput(_))),
            "accepted {raw}"
        );
    }

    #[test]
    fn test_valid_bare_object() {
        let result = validate(VALID).unwrap();
        assert_eq!(result.matching_score, 90.0);
        assert_eq!(result.matched_skills, vec!["Python"]);
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.summary, "Strong match");
        assert!(result.cost_estimate.is_none());
    }

    #[test]
    fn test_json_fence_stripped_same_result() {
        let fenced = format!("```json\n{VALID}\n```");
        assert_eq!(validate(&fenced).unwrap(), validate(VALID).unwrap());
    }

    #[test]
    fn test_untagged_and_single_line_fences() {
        assert!(validate(&format!("```\n{VALID}\n```")).is_ok());
        assert!(validate(&format!("```JSON{VALID}```")).is_ok());
        assert!(validate(&format!("  \n```json\n{VALID}\n```\n ")).is_ok());
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("{}"), "{}");
        assert_eq!(strip_code_fence("{}\n```"), "{}");
    }

    #[test]
    fn test_list_order_preserved() {
        let raw = r#"{"matching_score": 50, "matched_skills": ["Zig", "Ada", "Go"], "missing_skills": [], "matched_experience": [], "missing_experience": [], "summary": ""}"#;
        assert_eq!(validate(raw).unwrap().matched_skills, vec!["Zig", "Ada", "Go"]);
    }

    #[test]
    fn test_score_bounds_inclusive() {
        for score in ["0", "100", "99.5"] {
            let raw = VALID.replace("90", score);
            assert!(validate(&raw).is_ok(), "score {score}");
        }
    }

    #[test]
    fn test_missing_matching_score() {
        assert_malformed(r#"{"matched_skills": [], "missing_skills": [], "matched_experience": [], "missing_experience": [], "summary": "x"}"#);
    }

    #[test]
    fn test_score_out_of_range() {
        assert_malformed(&VALID.replace("90", "150"));
        assert_malformed(&VALID.replace("90", "-1"));
    }

    #[test]
    fn test_wrong_types_not_coerced() {
        assert_malformed(&VALID.replace("90", "\"90\""));
        assert_malformed(&VALID.replace("[\"Python\"]", "\"Python\""));
        assert_malformed(&VALID.replace("[\"Python\"]", "[1]"));
        assert_malformed(&VALID.replace("\"Strong match\"", "null"));
    }

    #[test]
    fn test_not_an_object() {
        assert_malformed(r#"[90, [], [], [], [], "summary"]"#);
        assert_malformed("The candidate is a strong match.");
        assert_malformed("");
    }

    #[test]
    fn test_prose_around_json_rejected() {
        assert_malformed(&format!("Here is the analysis: {VALID}"));
    }

    #[test]
    fn test_model_supplied_cost_ignored() {
        let raw = VALID.replace(
            "\"summary\"",
            r#""cost_estimate": {"usd": 99}, "summary""#,
        );
        assert!(validate(&raw).unwrap().cost_estimate.is_none());
    }
}
