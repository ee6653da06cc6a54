//! Error types for the transport core.

use thiserror::Error;

/// Errors that can occur while translating or sending a message.
#[derive(Debug, Error)]
pub enum Error {
    /// The message has no From address; no valid request can be built.
    #[error("Message has no From address")]
    MissingFrom,

    /// Body assembly produced neither html nor text content.
    #[error("Message has neither html nor text content")]
    EmptyBody,

    /// The provider call failed. Not retried here; the pipeline owns
    /// retry policy.
    #[error("API error: {0}")]
    Api(#[from] mailbridge_api::Error),

    /// Audit log write failed. Raised only in dev mode; swallowed with
    /// a warning otherwise.
    #[error("Audit log error: {0}")]
    AuditLog(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
