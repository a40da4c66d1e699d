//! Token usage tracking across model requests.

use std::collections::HashMap;

use crate::TokenUsage;

/// Tracks cumulative token usage per model for one session.
#[derive(Debug, Default)]
pub struct TokenTracker {
    total: TokenUsage,
    by_model: HashMap<String, TokenUsage>,
    /// Number of requests that reported usage.
    call_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record usage from one streamed response. Empty usage (the server
    /// sent none) is ignored.
    pub fn record(&mut self, model: &str, usage: &TokenUsage) {
        if usage.total_tokens() == 0 {
            return;
        }
        add(&mut self.total, usage);
        add(self.by_model.entry(model.to_string()).or_default(), usage);
        self.call_count += 1;
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    pub fn for_model(&self, model: &str) -> Option<&TokenUsage> {
        self.by_model.get(model)
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.total_tokens()
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn add(into: &mut TokenUsage, usage: &TokenUsage) {
    into.input_tokens = into.input_tokens.saturating_add(usage.input_tokens);
    into.output_tokens = into.output_tokens.saturating_add(usage.output_tokens);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(input: u64, output: u64) -> TokenUsage {
        TokenUsage {
            input_tokens: input,
            output_tokens: output,
        }
    }

    #[test]
    fn records_per_model_and_total() {
        let mut tracker = TokenTracker::new();
        tracker.record("llama3", &usage(10, 5));
        tracker.record("llama3", &usage(3, 2));
        tracker.record("gpt-4o", &usage(1, 1));

        assert_eq!(tracker.total_tokens(), 22);
        assert_eq!(tracker.call_count(), 3);
        assert_eq!(tracker.for_model("llama3"), Some(&usage(13, 7)));
        assert_eq!(tracker.for_model("mistral"), None);
    }

    #[test]
    fn empty_usage_is_not_counted() {
        let mut tracker = TokenTracker::new();
        tracker.record("llama3", &TokenUsage::default());
        assert_eq!(tracker.call_count(), 0);
        assert!(tracker.for_model("llama3").is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut tracker = TokenTracker::new();
        tracker.record("llama3", &usage(4, 4));
        tracker.reset();
        assert_eq!(tracker.total_tokens(), 0);
        assert_eq!(tracker.call_count(), 0);
    }
}
