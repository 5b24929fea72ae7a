pub mod types;

pub use types::{EvaluationResult, ExtractedDocument, RuleStatus};
