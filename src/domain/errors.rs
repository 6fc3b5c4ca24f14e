//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Nothing here is retried or
//! recovered silently; callers decide how to present each failure.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An authenticated operation was invoked with no signed-in identity.
    /// Raised before any network I/O.
    #[error("You must be signed in to perform this action.")]
    AuthenticationRequired,

    #[error("Credential fetch failed: {0}")]
    CredentialFetchFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Missing response data")]
    EmptyResponse,

    /// Structured application error from the backend, message kept verbatim.
    #[error("{0}")]
    Remote(String),

    #[error("Missing data/result payload")]
    MalformedEnvelope,

    #[error("Failed to decode response: {0}")]
    TransportDecode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
