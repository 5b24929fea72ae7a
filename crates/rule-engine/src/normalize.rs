//! Rule list validation. Runs before any extraction or evaluation work.

use thiserror::Error;

/// Number of rules every request must supply.
pub const REQUIRED_RULE_COUNT: usize = 3;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("Expected exactly {expected} rules, got {found}")]
    WrongCount { expected: usize, found: usize },

    #[error("Rule {number} is empty")]
    EmptyRule { number: usize },
}

/// Trim each rule and validate the list shape.
///
/// Deterministic and total over well-formed input; performs no I/O.
pub fn normalize_rules(raw: &[String]) -> Result<Vec<String>, RuleSetError> {
    if raw.len() != REQUIRED_RULE_COUNT {
        return Err(RuleSetError::WrongCount {
            expected: REQUIRED_RULE_COUNT,
            found: raw.len(),
        });
    }

    let mut rules = Vec::with_capacity(REQUIRED_RULE_COUNT);
    for (index, rule) in raw.iter().enumerate() {
        let trimmed = rule.trim();
        if trimmed.is_empty() {
            return Err(RuleSetError::EmptyRule { number: index + 1 });
        }
        rules.push(trimmed.to_string());
    }
    Ok(rules)
}
