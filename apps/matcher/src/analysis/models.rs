use serde::{Deserialize, Serialize};

/// Token counts and monetary estimate for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    /// Rounded to 6 decimal places.
    pub usd: f64,
}

/// Structured comparison of a résumé against a job description.
///
/// List order is the model's output order and is kept for display.
/// `cost_estimate` is `None` only between validation and cost accounting;
/// every result handed to a caller has it populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 0 to 100 inclusive.
    pub matching_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub matched_experience: Vec<String>,
    pub missing_experience: Vec<String>,
    pub summary: String,
    pub cost_estimate: Option<CostEstimate>,
}
