use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Document is {size} bytes, exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Unreadable document: {0}")]
    Unreadable(String),
}
