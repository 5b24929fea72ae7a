//! Per-rule evaluation.
//!
//! One (document text, rule) pair in, exactly one `EvaluationResult` out.
//! Evaluation of a rule never looks at any other rule. The decision
//! procedure is lexical-semantic: concept detectors cover common rule
//! targets regardless of formatting, term coverage over sentence windows
//! covers everything else, and prohibitions invert the verdict.

use shared_types::{EvaluationResult, RuleStatus};

use crate::detectors::{concepts_in_rule, find_concept, Concept};
use crate::patterns::{
    clip_excerpt, content_terms, sentence_windows, window_contains_term, NEGATION_MARKERS,
};

/// Match strength at or above which a presence rule passes (and an absence
/// rule fails).
const PASS_THRESHOLD: f64 = 0.6;

/// Longest evidence excerpt returned, in characters.
const MAX_EXCERPT_CHARS: usize = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    /// The rule requires something to be present.
    Presence,
    /// The rule prohibits something ("must not contain ...").
    Absence,
}

fn detect_polarity(rule: &str) -> Polarity {
    let lower = rule.to_lowercase();
    if NEGATION_MARKERS.iter().any(|m| lower.contains(m)) {
        Polarity::Absence
    } else {
        Polarity::Presence
    }
}

/// What the document search turned up for one rule.
struct MatchOutcome<'a> {
    /// Combined signal in [0, 1]; monotone in evidence strength.
    strength: f64,
    /// Concept that matched, if the rule named one and the document has it.
    concept: Option<Concept>,
    /// First concept the rule named, matched or not.
    named_concept: Option<Concept>,
    /// Rule terms found in the best window.
    matched_terms: Vec<String>,
    /// Rule terms searched for.
    terms: Vec<String>,
    /// Best matching excerpt, a verbatim span of the document text.
    excerpt: Option<&'a str>,
}

fn search_document<'a>(text: &'a str, rule: &str) -> Option<MatchOutcome<'a>> {
    let concepts = concepts_in_rule(rule);
    let terms = content_terms(rule);

    if concepts.is_empty() && terms.is_empty() {
        return None; // nothing checkable in the rule
    }

    let windows = sentence_windows(text);

    // Term coverage: best sentence window by fraction of rule terms present.
    let mut best_window: Option<(usize, usize)> = None;
    let mut matched_terms: Vec<String> = Vec::new();
    let mut coverage = 0.0f64;
    if !terms.is_empty() {
        for &(start, end) in &windows {
            let window_lower = text[start..end].to_lowercase();
            let matched: Vec<String> = terms
                .iter()
                .filter(|t| window_contains_term(&window_lower, t))
                .cloned()
                .collect();
            if matched.is_empty() {
                continue;
            }
            let c = matched.len() as f64 / terms.len() as f64;
            if c > coverage {
                coverage = c;
                matched_terms = matched;
                best_window = Some((start, end));
            }
        }
    }

    // Concept search runs over the whole text, not windows, so spans that
    // straddle a sentence boundary still count.
    let mut concept_hit = None;
    let mut concept_span = None;
    for &concept in &concepts {
        if let Some(span) = find_concept(text, concept) {
            concept_hit = Some(concept);
            concept_span = Some(span);
            break;
        }
    }

    let strength = if concept_hit.is_some() {
        (0.9 + 0.1 * coverage).min(1.0)
    } else {
        coverage
    };

    // Evidence: the window around the concept match when there is one,
    // otherwise the best term window.
    let excerpt = concept_span
        .map(|(s, e)| {
            windows
                .iter()
                .find(|&&(ws, we)| ws <= s && s < we)
                .map(|&(ws, we)| &text[ws..we])
                .unwrap_or(&text[s..e])
        })
        .or(best_window.map(|(s, e)| &text[s..e]))
        .map(|w| clip_excerpt(w, MAX_EXCERPT_CHARS));

    Some(MatchOutcome {
        strength,
        concept: concept_hit,
        named_concept: concepts.first().copied(),
        matched_terms,
        terms,
        excerpt,
    })
}

/// Evaluate one rule against extracted document text.
pub fn evaluate_rule(text: &str, rule: &str) -> EvaluationResult {
    let polarity = detect_polarity(rule);

    let outcome = match search_document(text, rule) {
        Some(outcome) => outcome,
        None => {
            return finalize(
                text,
                EvaluationResult {
                    rule: rule.to_string(),
                    status: RuleStatus::Fail,
                    reasoning: format!(
                        "The rule \"{}\" could not be interpreted: it contains no checkable terms.",
                        rule
                    ),
                    evidence: None,
                    confidence: 10,
                },
            );
        }
    };

    let result = match polarity {
        Polarity::Presence => presence_verdict(rule, &outcome),
        Polarity::Absence => absence_verdict(rule, &outcome),
    };
    finalize(text, result)
}

fn presence_verdict(rule: &str, outcome: &MatchOutcome<'_>) -> EvaluationResult {
    if outcome.strength >= PASS_THRESHOLD {
        EvaluationResult {
            rule: rule.to_string(),
            status: RuleStatus::Pass,
            reasoning: match_description(outcome),
            evidence: outcome.excerpt.map(|e| e.to_string()),
            confidence: confidence_for(outcome.strength),
        }
    } else if outcome.strength > 0.0 {
        let missing = missing_terms(outcome);
        EvaluationResult {
            rule: rule.to_string(),
            status: RuleStatus::Fail,
            reasoning: format!(
                "Only a partial match was found: {} appear(s) in the document, but {} do(es) not.",
                quote_terms(&outcome.matched_terms),
                quote_terms(&missing),
            ),
            evidence: outcome.excerpt.map(|e| e.to_string()),
            confidence: partial_confidence(outcome.strength),
        }
    } else {
        EvaluationResult {
            rule: rule.to_string(),
            status: RuleStatus::Fail,
            reasoning: format!(
                "No occurrence of {} was found anywhere in the document.",
                required_description(outcome)
            ),
            evidence: None,
            confidence: 80,
        }
    }
}

fn absence_verdict(rule: &str, outcome: &MatchOutcome<'_>) -> EvaluationResult {
    if outcome.strength == 0.0 {
        EvaluationResult {
            rule: rule.to_string(),
            status: RuleStatus::Pass,
            reasoning: format!(
                "No occurrence of {} was found; the prohibition holds.",
                required_description(outcome)
            ),
            evidence: None,
            confidence: 85,
        }
    } else if outcome.strength >= PASS_THRESHOLD {
        EvaluationResult {
            rule: rule.to_string(),
            status: RuleStatus::Fail,
            reasoning: format!("Prohibited content is present: {}", match_description(outcome)),
            evidence: outcome.excerpt.map(|e| e.to_string()),
            confidence: confidence_for(outcome.strength),
        }
    } else {
        // Weak partial signal on a prohibition: treat as absent, with
        // reduced certainty.
        EvaluationResult {
            rule: rule.to_string(),
            status: RuleStatus::Pass,
            reasoning: format!(
                "Only weak partial matches ({}) were found; no clear occurrence of the prohibited content.",
                quote_terms(&outcome.matched_terms)
            ),
            evidence: None,
            confidence: 55,
        }
    }
}

/// Map match strength to a confidence score. Monotone: stronger evidence
/// never yields a lower number.
fn confidence_for(strength: f64) -> u8 {
    (60.0 + strength * 35.0).round().clamp(0.0, 100.0) as u8
}

/// Confidence for a failed presence rule with a partial match. Weaker
/// partials leave the evaluator more certain the content is absent.
fn partial_confidence(strength: f64) -> u8 {
    (35.0 + (PASS_THRESHOLD - strength) / PASS_THRESHOLD * 25.0)
        .round()
        .clamp(0.0, 100.0) as u8
}

fn match_description(outcome: &MatchOutcome<'_>) -> String {
    match (outcome.concept, outcome.matched_terms.is_empty()) {
        (Some(concept), true) => {
            format!("The document contains {}, shown in the excerpt.", concept.label())
        }
        (Some(concept), false) => format!(
            "The document contains {} alongside the term(s) {}.",
            concept.label(),
            quote_terms(&outcome.matched_terms)
        ),
        (None, _) => format!(
            "The term(s) {} appear(s) in the excerpt shown.",
            quote_terms(&outcome.matched_terms)
        ),
    }
}

fn required_description(outcome: &MatchOutcome<'_>) -> String {
    match outcome.named_concept {
        Some(concept) => concept.label().to_string(),
        None if outcome.terms.is_empty() => "the required content".to_string(),
        None => format!("the term(s) {}", quote_terms(&outcome.terms)),
    }
}

fn missing_terms(outcome: &MatchOutcome<'_>) -> Vec<String> {
    outcome
        .terms
        .iter()
        .filter(|t| !outcome.matched_terms.contains(t))
        .cloned()
        .collect()
}

fn quote_terms(terms: &[String]) -> String {
    if terms.is_empty() {
        return "(none)".to_string();
    }
    terms
        .iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result constructor for upstream failures (timeout, panic). Every rule
/// yields exactly one result; this is the degraded one.
pub fn failure_result(rule: &str, reason: &str) -> EvaluationResult {
    EvaluationResult {
        rule: rule.to_string(),
        status: RuleStatus::Fail,
        reasoning: reason.to_string(),
        evidence: None,
        confidence: 0,
    }
}

/// Shape guard applied to every result before it leaves the evaluator:
/// confidence stays in [0,100], reasoning is non-empty, and evidence is a
/// verbatim span of the document text or is dropped.
fn finalize(text: &str, mut result: EvaluationResult) -> EvaluationResult {
    if result.confidence > 100 {
        result.confidence = 100;
    }
    if result.reasoning.trim().is_empty() {
        result.reasoning = "No reasoning was produced for this rule.".to_string();
    }
    if let Some(evidence) = &result.evidence {
        if evidence.trim().is_empty() || !text.contains(evidence.as_str()) {
            result.evidence = None;
        }
    }
    result
}
