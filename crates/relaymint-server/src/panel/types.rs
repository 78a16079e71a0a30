//! Panel API wire types.
//!
//! Serde structs matching the panel's JSON envelope and the client list
//! embedded in an inbound's serialized settings blob.

use serde::{Deserialize, Serialize};

use relaymint_core::ClientIdentity;

/// Standard panel response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PanelEnvelope {
    pub success: bool,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub obj: Option<serde_json::Value>,
}

/// The settings blob of one inbound.
///
/// The client list is append-only from this system's point of view: existing
/// entries ride through as raw JSON values, so the re-serialized blob
/// reproduces them verbatim whatever fields the panel put on them (including
/// panel-native Shadowsocks entries that carry no `id` at all). Every other
/// settings key is carried through the flattened map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundSettings {
    #[serde(default)]
    pub clients: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The one entry shape this system appends.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEntry {
    /// Connection credential (UUID).
    pub id: String,
    /// Display label; the short id doubles as the panel "email".
    pub email: String,
    pub enable: bool,
    pub limit_ip: u64,
    #[serde(rename = "totalGB")]
    pub total_gb: u64,
    pub expiry_time: i64,
    pub flow: String,
    pub tg_id: String,
    pub sub_id: String,
    pub reset: u64,
}

impl ClientEntry {
    /// Build an enabled, unlimited entry for a freshly minted identity.
    pub fn from_identity(identity: &ClientIdentity) -> Self {
        Self {
            id: identity.credential.clone(),
            email: identity.short_id.clone(),
            enable: true,
            limit_ip: 0,
            total_gb: 0,
            expiry_time: 0,
            flow: String::new(),
            tg_id: String::new(),
            sub_id: identity.short_id.clone(),
            reset: 0,
        }
    }
}
