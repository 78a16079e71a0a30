//! Panel registration client.
//!
//! One registration is a login, a fetch of the inbound's full configuration
//! object, an append to the client list inside its settings blob, and an
//! update call pushing the whole object back. The fetch-then-push window is
//! serialized per inbound id within this process; writers in other processes
//! are not coordinated against, so an external concurrent mutator can still
//! lose an entry (last writer wins).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use relaymint_core::{ClientIdentity, Error, Result};

use super::types::{ClientEntry, InboundSettings, PanelEnvelope};
use crate::net::{http_client, send_error};

/// Configuration for connecting to a relay panel instance.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Panel base URL (e.g. "<https://relay.example:2053>").
    pub base_url: String,
    /// Operator login.
    pub username: String,
    pub password: String,
    /// Fixed network timeout for every panel call.
    pub timeout: Duration,
}

/// The relay endpoint a registered client connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEndpoint {
    /// Relay host, parsed from the panel base URL.
    pub host: String,
    /// The inbound's configured listener port.
    pub port: u16,
}

/// Reqwest-based panel client.
///
/// The HTTP client and its cookie jar are built once and shared across
/// registrations, so a session cookie can physically outlive the call that
/// created it. It is never relied on: every registration starts with a fresh
/// login, which replaces whatever cookie the jar still holds.
#[derive(Debug)]
pub struct PanelClient {
    http: reqwest::Client,
    base_url: String,
    host: String,
    username: String,
    password: String,
    /// Per-inbound locks serializing the fetch-then-push window.
    inbound_locks: Mutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl PanelClient {
    /// Create a new panel client.
    pub fn new(config: &PanelConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::Validation("panel base_url is empty".into()));
        }
        if config.username.is_empty() {
            return Err(Error::Validation("panel username is empty".into()));
        }

        let url = reqwest::Url::parse(&config.base_url)
            .map_err(|e| Error::Validation(format!("invalid panel base URL: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::Encoding("panel base URL has no host".into()))?
            .to_string();

        Ok(Self {
            http: http_client(config.timeout)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            host,
            username: config.username.clone(),
            password: config.password.clone(),
            inbound_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Build a panel URL for a given path.
    pub(crate) fn panel_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Relay host the panel base URL points at.
    pub fn relay_host(&self) -> &str {
        &self.host
    }

    /// Register a freshly minted identity on the given inbound.
    ///
    /// Returns the relay endpoint for URI encoding: the host from the
    /// configured base URL and the port from the originally fetched inbound
    /// object. Any failure aborts the whole call with no local state created.
    pub async fn register_client(
        &self,
        inbound_id: u64,
        identity: &ClientIdentity,
    ) -> Result<RelayEndpoint> {
        let _guard = self.lock_inbound(inbound_id).await;

        self.login().await?;

        let mut obj = self.fetch_inbound(inbound_id).await?;
        let settings_raw = obj
            .get("settings")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::BackendNotFound(format!("inbound {inbound_id} has no settings payload"))
            })?;
        let port_raw = obj.get("port").and_then(Value::as_u64).ok_or_else(|| {
            Error::BackendNotFound(format!("inbound {inbound_id} has no port"))
        })?;
        let port = u16::try_from(port_raw)
            .map_err(|_| Error::Encoding(format!("inbound {inbound_id} port out of range")))?;

        let mut settings: InboundSettings = serde_json::from_str(settings_raw)?;
        settings
            .clients
            .push(serde_json::to_value(ClientEntry::from_identity(identity))?);

        obj.insert(
            "settings".to_string(),
            Value::String(serde_json::to_string(&settings)?),
        );
        self.update_inbound(inbound_id, &obj).await?;

        info!(
            inbound_id,
            short_id = %identity.short_id,
            clients = settings.clients.len(),
            "registered client on inbound"
        );
        Ok(RelayEndpoint {
            host: self.host.clone(),
            port,
        })
    }

    /// Take the per-inbound lock, creating it on first use.
    async fn lock_inbound(&self, inbound_id: u64) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inbound_locks.lock().await;
            Arc::clone(locks.entry(inbound_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Establish a panel session; the cookie lives in the client's jar.
    async fn login(&self) -> Result<()> {
        let resp = self
            .http
            .post(self.panel_url("/login"))
            .form(&[("username", self.username.as_str()), ("password", self.password.as_str())])
            .send()
            .await
            .map_err(send_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::BackendAuth(format!("login returned HTTP {status}")));
        }
        let body: PanelEnvelope = resp.json().await.map_err(send_error)?;
        if !body.success {
            let msg = if body.msg.is_empty() {
                "login rejected".to_string()
            } else {
                body.msg
            };
            return Err(Error::BackendAuth(msg));
        }
        debug!("panel session established");
        Ok(())
    }

    /// Fetch the full inbound object by id.
    async fn fetch_inbound(
        &self,
        inbound_id: u64,
    ) -> Result<serde_json::Map<String, Value>> {
        let resp = self
            .http
            .get(self.panel_url(&format!("/panel/api/inbounds/get/{inbound_id}")))
            .send()
            .await
            .map_err(send_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::BackendRejected {
                status: status.as_u16(),
                message: format!("inbound fetch returned HTTP {status}"),
            });
        }
        let body: PanelEnvelope = resp.json().await.map_err(send_error)?;
        let not_found =
            || Error::BackendNotFound(format!("inbound {inbound_id} not found on panel"));
        if !body.success {
            return Err(not_found());
        }
        match body.obj {
            Some(Value::Object(map)) => Ok(map),
            _ => Err(not_found()),
        }
    }

    /// Push the whole inbound object back, settings re-serialized.
    async fn update_inbound(
        &self,
        inbound_id: u64,
        obj: &serde_json::Map<String, Value>,
    ) -> Result<()> {
        let resp = self
            .http
            .post(self.panel_url(&format!("/panel/api/inbounds/update/{inbound_id}")))
            .json(obj)
            .send()
            .await
            .map_err(send_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::BackendRejected {
                status: status.as_u16(),
                message: format!("inbound update returned HTTP {status}"),
            });
        }
        let body: PanelEnvelope = resp.json().await.map_err(send_error)?;
        if !body.success {
            return Err(Error::BackendRejected {
                status: status.as_u16(),
                message: if body.msg.is_empty() {
                    "inbound update rejected".to_string()
                } else {
                    body.msg
                },
            });
        }
        Ok(())
    }
}
