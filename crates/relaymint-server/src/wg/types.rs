//! WireGuard backend wire types.

use serde::{Deserialize, Serialize};

/// Backend response envelope: `{status, data?, error?}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WgEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> WgEnvelope<T> {
    /// `true` when the backend reports success.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// The backend's own error payload, for diagnostics.
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| format!("backend status {:?}", self.status))
    }
}

/// One client record as listed by the backend.
///
/// Only id/name are interpreted; everything else rides along in `extra` so
/// the raw record can be returned to the caller unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WgClientRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
