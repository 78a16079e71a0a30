//! Configuration resolution for RelayMint.
//!
//! Resolution order, lowest to highest priority:
//! 1. Built-in defaults
//! 2. JSON settings file (`--config` path)
//! 3. Environment variables (`RELAYMINT_*`)
//!
//! The resolved [`Settings`] value is constructed once at startup and passed
//! into each backend client's constructor. Nothing reads configuration
//! ambiently after that point, so clients are testable with fixture settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Complete RelayMint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub panel: PanelSettings,
    #[serde(default)]
    pub wireguard: WgSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Relay panel (3x-ui family) connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSettings {
    /// Panel base URL, e.g. `https://relay.example:2053`.
    pub base_url: String,
    /// Operator login for the panel session.
    pub username: String,
    pub password: String,
    /// Inbound hosting the VLESS client list.
    pub vless_inbound_id: u64,
    /// Inbound hosting the Shadowsocks client list.
    pub shadowsocks_inbound_id: u64,
    /// Fixed network timeout applied to every panel call, in seconds.
    pub timeout_secs: u64,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            password: String::new(),
            vless_inbound_id: 2,
            shadowsocks_inbound_id: 10,
            timeout_secs: 15,
        }
    }
}

/// WireGuard backend (wg-easy family) connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WgSettings {
    /// Backend base URL, e.g. `http://10.0.0.2:51821`.
    pub base_url: String,
    /// API password used to open a backend session.
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for WgSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout_secs: 15,
        }
    }
}

/// Artifact store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Root directory for per-client artifact directories.
    pub users_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            users_dir: PathBuf::from("users"),
        }
    }
}

/// Load settings with file and environment resolution.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(p) => load_settings_file(p)?,
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Validation(format!("Failed to read settings file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Validation(format!("Failed to parse settings file {}: {}", path.display(), e))
    })
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("RELAYMINT_PANEL_URL") {
        settings.panel.base_url = val;
    }
    if let Ok(val) = std::env::var("RELAYMINT_PANEL_USER") {
        settings.panel.username = val;
    }
    if let Ok(val) = std::env::var("RELAYMINT_PANEL_PASS") {
        settings.panel.password = val;
    }
    if let Ok(val) = std::env::var("RELAYMINT_WG_URL") {
        settings.wireguard.base_url = val;
    }
    if let Ok(val) = std::env::var("RELAYMINT_WG_API_KEY") {
        settings.wireguard.api_key = val;
    }
    if let Ok(val) = std::env::var("RELAYMINT_USERS_DIR") {
        settings.storage.users_dir = PathBuf::from(val);
    }
}
