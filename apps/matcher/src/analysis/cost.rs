//! Token totals and the USD estimate attached to a result.

use std::collections::HashMap;

use crate::analysis::models::{AnalysisResult, CostEstimate};

/// Used for models missing from the pricing table.
pub const DEFAULT_PRICE_PER_1K: f64 = 0.0015;

/// USD per 1K tokens, keyed by model name.
#[derive(Debug, Clone)]
pub struct PricingTable {
    prices: HashMap<String, f64>,
}

impl Default for PricingTable {
    fn default() -> Self {
        let prices = [
            ("gpt-3.5-turbo", 0.0015),
            ("gpt-4o-mini", 0.0006),
            ("gpt-4o", 0.005),
            ("claude-sonnet-4-5", 0.003),
        ]
        .into_iter()
        .map(|(model, price)| (model.to_string(), price))
        .collect();
        Self { prices }
    }
}

impl PricingTable {
    pub fn price_per_1k(&self, model: &str) -> f64 {
        self.prices
            .get(model)
            .copied()
            .unwrap_or(DEFAULT_PRICE_PER_1K)
    }
}

/// `usd = total / 1000 * price`, rounded to 6 decimal places.
pub fn estimate(prompt_tokens: u64, completion_tokens: u64, price_per_1k: f64) -> CostEstimate {
    let total_tokens = prompt_tokens + completion_tokens;
    let usd = total_tokens as f64 / 1000.0 * price_per_1k;
    CostEstimate {
        prompt_tokens,
        completion_tokens,
        total_tokens,
        usd: round6(usd),
    }
}

/// Final step before a result is returned to the caller.
pub fn attach_cost(
    mut result: AnalysisResult,
    prompt_tokens: u64,
    completion_tokens: u64,
    price_per_1k: f64,
) -> AnalysisResult {
    result.cost_estimate = Some(estimate(prompt_tokens, completion_tokens, price_per_1k));
    result
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
