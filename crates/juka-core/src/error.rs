//! Error type for document import.

/// Result alias for `juka-core` operations that can fail.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures at the JSON boundary. Missing optional fields are never errors;
/// they fall back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document has no `scenes` list")]
    MissingScenes,

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}
