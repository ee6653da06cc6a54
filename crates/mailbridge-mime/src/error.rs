//! Error types for message model operations.

/// Result type alias for message model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message model error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),
}
