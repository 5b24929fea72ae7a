//! Fans normalized rules out to the evaluator and reassembles results in
//! input order.

use std::sync::Arc;
use std::time::Duration;

use shared_types::EvaluationResult;

use rule_engine::{failure_result, RuleEngine};

/// Evaluation seam: anything that can judge one rule against document text.
pub trait Evaluator: Send + Sync + 'static {
    fn evaluate(&self, text: &str, rule: &str) -> EvaluationResult;
}

impl Evaluator for RuleEngine {
    fn evaluate(&self, text: &str, rule: &str) -> EvaluationResult {
        RuleEngine::evaluate(self, text, rule)
    }
}

/// Aborts the per-rule tasks when the batch is dropped, whether from the
/// global timeout or the caller abandoning the request mid-flight.
struct AbortOnDrop(Vec<tokio::task::AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Evaluate every rule concurrently, one task per rule, each under
/// `rule_timeout`. A timed-out or crashed task degrades to a zero-confidence
/// `fail` result for that rule alone. Results are awaited in spawn order, so
/// the output order always matches the input order regardless of which
/// evaluation finishes first.
///
/// Exceeding `request_timeout` aborts everything still in flight and returns
/// the elapsed error; no partial result set survives that. Dropping the
/// returned future (client disconnect) aborts the in-flight tasks too.
pub async fn evaluate_rules<E: Evaluator>(
    evaluator: Arc<E>,
    text: Arc<str>,
    rules: &[String],
    rule_timeout: Duration,
    request_timeout: Duration,
) -> Result<Vec<EvaluationResult>, tokio::time::error::Elapsed> {
    let handles: Vec<tokio::task::JoinHandle<EvaluationResult>> = rules
        .iter()
        .cloned()
        .map(|rule| {
            let evaluator = evaluator.clone();
            let text = text.clone();
            tokio::spawn(async move {
                // The evaluation itself is CPU-bound; keep it off async workers.
                let blocking_rule = rule.clone();
                let work =
                    tokio::task::spawn_blocking(move || evaluator.evaluate(&text, &blocking_rule));

                match tokio::time::timeout(rule_timeout, work).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(join_error)) => {
                        tracing::error!("evaluation of rule \"{}\" crashed: {}", rule, join_error);
                        failure_result(
                            &rule,
                            "Evaluation failed unexpectedly; this rule could not be checked.",
                        )
                    }
                    Err(_) => {
                        tracing::warn!("evaluation of rule \"{}\" timed out", rule);
                        failure_result(&rule, "Evaluation timed out before a verdict was reached.")
                    }
                }
            })
        })
        .collect();

    let _abort_guard = AbortOnDrop(handles.iter().map(|h| h.abort_handle()).collect());

    let owned_rules = rules.to_vec();
    let gather = async move {
        let mut results = Vec::with_capacity(handles.len());
        for (handle, rule) in handles.into_iter().zip(owned_rules) {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => {
                    tracing::error!("evaluation task for rule \"{}\" died: {}", rule, join_error);
                    failure_result(
                        &rule,
                        "Evaluation failed unexpectedly; this rule could not be checked.",
                    )
                }
            };
            results.push(result);
        }
        results
    };

    tokio::time::timeout(request_timeout, gather).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::RuleStatus;

    /// Test evaluator: sleeps when the rule contains "slow", passes otherwise.
    struct StubEvaluator {
        delay: Duration,
    }

    impl Evaluator for StubEvaluator {
        fn evaluate(&self, _text: &str, rule: &str) -> EvaluationResult {
            if rule.contains("slow") {
                std::thread::sleep(self.delay);
            }
            EvaluationResult {
                rule: rule.to_string(),
                status: RuleStatus::Pass,
                reasoning: "stub verdict".to_string(),
                evidence: None,
                confidence: 90,
            }
        }
    }

    fn rules(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_preserves_input_order() {
        let evaluator = Arc::new(StubEvaluator {
            delay: Duration::ZERO,
        });
        let input = rules(&["first", "second", "third"]);
        let results = evaluate_rules(
            evaluator,
            Arc::from("text"),
            &input,
            Duration::from_secs(5),
            Duration::from_secs(10),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 3);
        for (result, rule) in results.iter().zip(&input) {
            assert_eq!(&result.rule, rule);
        }
    }

    #[tokio::test]
    async fn test_single_timeout_degrades_only_that_rule() {
        let evaluator = Arc::new(StubEvaluator {
            delay: Duration::from_millis(500),
        });
        let input = rules(&["fast one", "slow one", "fast two"]);
        let results = evaluate_rules(
            evaluator,
            Arc::from("text"),
            &input,
            Duration::from_millis(50),
            Duration::from_secs(10),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, RuleStatus::Pass);
        assert_eq!(results[2].status, RuleStatus::Pass);
        assert_eq!(results[1].status, RuleStatus::Fail);
        assert_eq!(results[1].confidence, 0);
        assert!(results[1].reasoning.contains("timed out"));
    }

    #[tokio::test]
    async fn test_global_timeout_fails_whole_batch() {
        let evaluator = Arc::new(StubEvaluator {
            delay: Duration::from_millis(500),
        });
        let input = rules(&["slow a", "slow b", "slow c"]);
        let outcome = evaluate_rules(
            evaluator,
            Arc::from("text"),
            &input,
            Duration::from_secs(5),
            Duration::from_millis(50),
        )
        .await;

        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn test_real_engine_through_orchestrator() {
        let engine = Arc::new(RuleEngine::new());
        let input = rules(&[
            "Document must mention a date",
            "must not contain an email address",
            "mentions the warranty period",
        ]);
        let results = evaluate_rules(
            engine,
            Arc::from("Signed on 2024-03-18. Warranty period: 12 months."),
            &input,
            Duration::from_secs(5),
            Duration::from_secs(10),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, RuleStatus::Pass);
        assert_eq!(results[1].status, RuleStatus::Pass);
        assert_eq!(results[2].status, RuleStatus::Pass);
    }
}
