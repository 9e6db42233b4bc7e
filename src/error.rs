use thiserror::Error;

/// Errors surfaced by the support-desk library.
///
/// Each variant maps to one failure class: HTTP handlers and the tool adapter
/// decide how to degrade based on the variant, never on the message text.
#[derive(Debug, Error)]
pub enum SupportError {
    /// Missing or empty required input. Rejected before any side effect.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The embedding provider could not vectorize the text.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Chat-completion or web-search provider failure.
    #[error("provider error: {0}")]
    Provider(String),

    /// Database unavailable or query failure.
    #[error("store error: {0}")]
    Store(String),

    /// Fatal misconfiguration, e.g. an embedding dimension mismatch.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type SupportResult<T> = Result<T, SupportError>;

impl SupportError {
    pub fn validation(msg: impl Into<String>) -> Self {
        SupportError::Validation(msg.into())
    }
}

impl From<sqlx::Error> for SupportError {
    fn from(err: sqlx::Error) -> Self {
        SupportError::Store(err.to_string())
    }
}
