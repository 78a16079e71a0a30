//! WireGuard backend adapter.
//!
//! The backend's create call does not return the new record's identifier, so
//! provisioning is create → list → exact-name match → fetch config and QR by
//! the backend-assigned id.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info};

use relaymint_core::{Error, Result};

use super::types::{WgClientRecord, WgEnvelope};
use crate::net::{http_client, send_error};

/// Configuration for connecting to a WireGuard backend instance.
#[derive(Debug, Clone)]
pub struct WgConfig {
    /// Backend base URL (e.g. "<http://10.0.0.2:51821>").
    pub base_url: String,
    /// API password used to open a session.
    pub api_key: String,
    /// Fixed network timeout for every backend call.
    pub timeout: Duration,
}

/// Everything the backend hands back for one provisioned client.
#[derive(Debug, Clone)]
pub struct WgProvisioned {
    pub record: WgClientRecord,
    /// Fully rendered config text, persisted verbatim.
    pub config_text: String,
    /// Backend-rendered QR image bytes (PNG).
    pub qr_image: Vec<u8>,
}

/// Reqwest-based adapter holding the backend session cookie.
#[derive(Debug)]
pub struct WgClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WgClient {
    /// Create a new WireGuard backend adapter.
    pub fn new(config: &WgConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::Validation("wireguard base_url is empty".into()));
        }
        Ok(Self {
            http: http_client(config.timeout)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build a backend URL for a given path.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Create a client by display name and fetch its config text and QR image.
    pub async fn provision_client(&self, name: &str) -> Result<WgProvisioned> {
        self.open_session().await?;
        self.create_client(name).await?;
        let record = self.find_client(name).await?;
        let qr_image = self.client_qr(&record.id).await?;
        let config_text = self.client_config(&record.id).await?;
        info!(client_id = %record.id, name, "provisioned wireguard client");
        Ok(WgProvisioned {
            record,
            config_text,
            qr_image,
        })
    }

    /// Open a backend session, preferring the "init" entry point.
    ///
    /// Older backend builds only expose the "create" call; a 404 on init
    /// falls through to it.
    async fn open_session(&self) -> Result<()> {
        let init = self
            .http
            .post(self.api_url("/session/init"))
            .json(&json!({ "password": self.api_key }))
            .send()
            .await
            .map_err(send_error)?;

        let resp = if init.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("session init endpoint absent, falling back to create");
            self.http
                .post(self.api_url("/session"))
                .json(&json!({ "password": self.api_key }))
                .send()
                .await
                .map_err(send_error)?
        } else {
            init
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::BackendAuth(format!(
                "session call returned HTTP {status}"
            )));
        }
        let body: WgEnvelope<serde_json::Value> = resp.json().await.map_err(send_error)?;
        if !body.is_success() {
            return Err(Error::BackendAuth(body.error_message()));
        }
        Ok(())
    }

    /// Create a client record; the backend does not return its id.
    async fn create_client(&self, name: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.api_url("/wireguard/client"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .map_err(send_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::BackendRejected {
                status: status.as_u16(),
                message: format!("client create returned HTTP {status}"),
            });
        }
        let body: WgEnvelope<serde_json::Value> = resp.json().await.map_err(send_error)?;
        if !body.is_success() {
            return Err(Error::BackendRejected {
                status: status.as_u16(),
                message: body.error_message(),
            });
        }
        Ok(())
    }

    /// List all clients and locate one by exact name match.
    async fn find_client(&self, name: &str) -> Result<WgClientRecord> {
        let resp = self
            .http
            .get(self.api_url("/wireguard/client"))
            .send()
            .await
            .map_err(send_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::BackendRejected {
                status: status.as_u16(),
                message: format!("client list returned HTTP {status}"),
            });
        }
        let body: WgEnvelope<Vec<WgClientRecord>> = resp.json().await.map_err(send_error)?;
        if !body.is_success() {
            return Err(Error::BackendRejected {
                status: status.as_u16(),
                message: body.error_message(),
            });
        }
        body.data
            .unwrap_or_default()
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| {
                Error::BackendNotFound(format!("client {name:?} not found after create"))
            })
    }

    /// Fetch the backend-rendered QR image bytes for a client.
    async fn client_qr(&self, client_id: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .get(self.api_url(&format!("/wireguard/client/{client_id}/qrcode")))
            .send()
            .await
            .map_err(send_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::BackendRejected {
                status: status.as_u16(),
                message: format!("client QR fetch returned HTTP {status}"),
            });
        }
        Ok(resp.bytes().await.map_err(send_error)?.to_vec())
    }

    /// Fetch the rendered config text for a client.
    async fn client_config(&self, client_id: &str) -> Result<String> {
        let resp = self
            .http
            .get(self.api_url(&format!("/wireguard/client/{client_id}/configuration")))
            .send()
            .await
            .map_err(send_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::BackendRejected {
                status: status.as_u16(),
                message: format!("client config fetch returned HTTP {status}"),
            });
        }
        resp.text().await.map_err(send_error)
    }
}
