//! Concept detectors: rules that name a well-known concept ("mentions a
//! date", "includes a signature block") are satisfied by any occurrence of
//! that concept, whatever its formatting in the document.

use lazy_static::lazy_static;
use regex::Regex;

use crate::patterns::tokenize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concept {
    Date,
    Email,
    Phone,
    Money,
    Percentage,
    Url,
    Signature,
}

impl Concept {
    /// Human-readable label used in reasoning strings.
    pub fn label(&self) -> &'static str {
        match self {
            Concept::Date => "a date",
            Concept::Email => "an email address",
            Concept::Phone => "a phone number",
            Concept::Money => "a monetary amount",
            Concept::Percentage => "a percentage",
            Concept::Url => "a URL",
            Concept::Signature => "a signature block",
        }
    }
}

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(
        r"(?ix)\b(?:
            \d{1,2}[/-]\d{1,2}[/-]\d{2,4}
          | \d{4}-\d{2}-\d{2}
          | (?:january|february|march|april|may|june|july|august|september|october|november|december
             |jan|feb|mar|apr|jun|jul|aug|sept?|oct|nov|dec)\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}
          | \d{1,2}(?:st|nd|rd|th)?\s+(?:of\s+)?
            (?:january|february|march|april|may|june|july|august|september|october|november|december)
            ,?\s+\d{4}
        )\b"
    )
    .unwrap();
    static ref EMAIL_RE: Regex =
        Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap();
    static ref PHONE_RE: Regex =
        Regex::new(r"(?:\+?\d{1,2}[\s.-])?\(?\d{3}\)?[\s.-]\d{3}[\s.-]?\d{4}\b").unwrap();
    static ref MONEY_RE: Regex = Regex::new(
        r"(?ix)(?:[$€£]\s?\d[\d,]*(?:\.\d{1,2})?)
         |(?:\b\d[\d,]*(?:\.\d{1,2})?\s?(?:dollars?|usd|eur|euros?|gbp|cents?)\b)"
    )
    .unwrap();
    static ref PERCENT_RE: Regex =
        Regex::new(r"(?i)\b\d+(?:\.\d+)?\s?(?:%|percent|per\s+cent)").unwrap();
    static ref URL_RE: Regex =
        Regex::new(r#"(?i)\bhttps?://[^\s<>"')\]]+|\bwww\.[^\s<>"')\]]+"#).unwrap();
    static ref SIGNATURE_RE: Regex = Regex::new(
        r"(?i)\b(?:signatures?|signed\s+by|signatory|signatories|undersigned|sign\s+here|executed\s+by)\b|/s/"
    )
    .unwrap();
}

/// Concepts a rule names, detected from trigger words in the rule text.
pub fn concepts_in_rule(rule: &str) -> Vec<Concept> {
    let tokens = tokenize(rule);
    let has = |w: &str| tokens.iter().any(|t| t == w);
    let lower = rule.to_lowercase();

    let mut concepts = Vec::new();
    if has("date") || has("dates") || has("dated") {
        concepts.push(Concept::Date);
    }
    if has("email") || has("emails") || lower.contains("e-mail") {
        concepts.push(Concept::Email);
    }
    if has("phone") || has("telephone") {
        concepts.push(Concept::Phone);
    }
    if has("amount") || has("price") || has("cost") || has("fee") || has("dollar")
        || has("dollars") || has("money") || has("currency")
    {
        concepts.push(Concept::Money);
    }
    if has("percent") || has("percentage") {
        concepts.push(Concept::Percentage);
    }
    if has("url") || has("urls") || has("link") || has("links") || has("website")
        || has("hyperlink")
    {
        concepts.push(Concept::Url);
    }
    if has("signature") || has("signatures") || has("signatory") || has("signed") {
        concepts.push(Concept::Signature);
    }
    concepts
}

/// Earliest occurrence of the concept in the document text.
/// Returns the byte span of the match.
pub fn find_concept(text: &str, concept: Concept) -> Option<(usize, usize)> {
    let re: &Regex = match concept {
        Concept::Date => &DATE_RE,
        Concept::Email => &EMAIL_RE,
        Concept::Phone => &PHONE_RE,
        Concept::Money => &MONEY_RE,
        Concept::Percentage => &PERCENT_RE,
        Concept::Url => &URL_RE,
        Concept::Signature => &SIGNATURE_RE,
    };
    re.find(text).map(|m| (m.start(), m.end()))
}
