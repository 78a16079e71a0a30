//! Shared helpers for backend HTTP calls.

use std::time::Duration;

use relaymint_core::{Error, Result};

/// Build a cookie-holding HTTP client with a fixed request timeout.
///
/// Cookie support carries the panel's session cookie across the calls of one
/// registration; no session is reused across requests.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
    // The `Err` case just means it was already installed — safe to ignore.
    let _ = rustls::crypto::ring::default_provider().install_default();

    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Validation(format!("failed to build HTTP client: {e}")))
}

/// Map a reqwest failure onto the provisioning taxonomy.
///
/// Connect errors and timeouts mean the backend is unreachable; everything
/// else (body decode, protocol faults) counts as a backend rejection.
pub(crate) fn send_error(err: reqwest::Error) -> Error {
    if err.is_timeout() || err.is_connect() {
        Error::BackendUnavailable(err.to_string())
    } else {
        Error::BackendRejected {
            status: err.status().map_or(0, |s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
