//! The comparison prompt sent to the model.

use crate::ingestion::CleanText;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Role line shared by the system prompt and the prompt header.
const ROLE: &str = "You are an expert HR assistant.";

/// Field enumeration; must stay in lockstep with `AnalysisResult`.
const SCHEMA_DESCRIPTION: &str = r#"Output a JSON object with exactly these fields:
- "matching_score": number between 0 and 100 (inclusive), the overall match
- "matched_skills": array of strings, skills in the job description the candidate has
- "missing_skills": array of strings, skills in the job description the candidate lacks
- "matched_experience": array of strings, required experience the candidate has
- "missing_experience": array of strings, required experience the candidate lacks
- "summary": string, a short narrative assessment of the fit
- "cost_estimate": always null; it is computed by the system, do not estimate it"#;

const TRAILER: &str = "Respond ONLY with the JSON object. \
    No prose before or after it, no markdown, no code fences.";

/// System prompt for the comparison call.
pub fn analysis_system_prompt() -> String {
    format!("{ROLE} {JSON_ONLY_SYSTEM}")
}

/// Renders the comparison prompt.
///
/// `CleanText` never contains newlines, so the blank-line section markers
/// cannot occur inside either text and distinct inputs always give distinct
/// prompts.
pub fn build_prompt(job: &CleanText, resume: &CleanText) -> String {
    format!(
        "{ROLE} Analyze the following candidate resume against the job description. \
         Extract and compare skills and experience.\n\n\
         {SCHEMA_DESCRIPTION}\n\n\
         Job Description:\n{job}\n\n\
         Candidate Resume:\n{resume}\n\n\
         {TRAILER}"
    )
}
