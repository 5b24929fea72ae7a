pub mod detectors;
pub mod evaluate;
pub mod normalize;
pub mod patterns;

pub use evaluate::{evaluate_rule, failure_result};
pub use normalize::{normalize_rules, RuleSetError, REQUIRED_RULE_COUNT};

use shared_types::EvaluationResult;

/// RuleEngine entry point
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate one rule against extracted document text.
    pub fn evaluate(&self, text: &str, rule: &str) -> EvaluationResult {
        evaluate::evaluate_rule(text, rule)
    }

    /// Evaluate a normalized rule list in order. Each rule is evaluated
    /// independently; callers that want concurrency dispatch `evaluate`
    /// per rule themselves.
    pub fn evaluate_all(&self, text: &str, rules: &[String]) -> Vec<EvaluationResult> {
        rules.iter().map(|rule| self.evaluate(text, rule)).collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
