//! Rough spend tracking for LLM calls
//!
//! Providers bill on tokens, which we never see through the chat API, so the
//! estimate uses four characters per prompt token plus the full completion
//! budget.

use std::sync::Mutex;

/// USD per 1000 tokens used for estimates
pub const USD_PER_1K_TOKENS: f64 = 0.003;

/// Planning estimate for one research task end to end
pub const USD_PER_RESEARCH_TASK: f64 = 0.05;

/// Planning estimate for one claim validation
pub const USD_PER_VALIDATION: f64 = 0.03;

/// Estimated cost of a single request
pub fn estimate_call_cost(prompt_chars: usize, max_tokens: u32) -> f64 {
    let tokens = prompt_chars / 4 + max_tokens as usize;
    (tokens as f64 / 1000.0) * USD_PER_1K_TOKENS
}

/// Running total shared by every stage of a run
#[derive(Debug, Default)]
pub struct CostTracker {
    total: Mutex<f64>,
}

impl CostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, amount: f64) {
        let mut total = self.total.lock().unwrap_or_else(|e| e.into_inner());
        *total += amount;
    }

    pub fn record_call(&self, prompt_chars: usize, max_tokens: u32) {
        self.record(estimate_call_cost(prompt_chars, max_tokens));
    }

    pub fn total(&self) -> f64 {
        *self.total.lock().unwrap_or_else(|e| e.into_inner())
    }
}
