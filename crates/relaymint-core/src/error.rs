//! Error types for `RelayMint` operations.

use thiserror::Error;

/// Result type alias using `RelayMint` Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Provisioning error taxonomy.
///
/// Every failure aborts the request at the point of occurrence; nothing is
/// retried automatically. Callers surface `to_string()` as the failure
/// message of a structured response.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid request input (transport kind, client name).
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Backend login rejected or session could not be established.
    #[error("Backend authentication failed: {0}")]
    BackendAuth(String),

    /// The named inbound or client record does not exist on the backend.
    #[error("Backend object not found: {0}")]
    BackendNotFound(String),

    /// The backend answered with a non-success status or envelope.
    #[error("Backend rejected the request ({status}): {message}")]
    BackendRejected { status: u16, message: String },

    /// Network-level failure: connect error or request timeout.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Directory or file write failure in the artifact store.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Malformed URI inputs or QR encoding failure.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A backend payload (settings blob, response envelope) failed to parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
