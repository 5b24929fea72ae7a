/// Text extracted from an uploaded document. Built once per request by the
/// ingestor and discarded with the response; never persisted.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExtractedDocument {
    pub pages: u32,
    /// Full normalized text of the document.
    pub text: String,
    pub page_texts: Vec<String>, // Per-page text, for evidence localization
    /// True when extraction was best-effort (some pages unreadable).
    pub partial: bool,
}

impl ExtractedDocument {
    /// Wrap already-extracted text as a single-page document.
    pub fn single_page(text: String) -> Self {
        Self {
            pages: 1,
            page_texts: vec![text.clone()],
            text,
            partial: false,
        }
    }
}

/// Verdict for one rule. No third state: an evaluator that cannot decide
/// resolves to `Fail` with low confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleStatus::Pass => write!(f, "pass"),
            RuleStatus::Fail => write!(f, "fail"),
        }
    }
}

/// Outcome of evaluating a single rule against a document.
///
/// `evidence`, when present, is a verbatim span of the extracted text.
/// `confidence` is 0-100.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EvaluationResult {
    pub rule: String,
    pub status: RuleStatus,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    pub confidence: u8,
}
