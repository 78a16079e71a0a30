//! Provisioning orchestrator.
//!
//! One request runs the sequence: mint identity → register with the backend
//! selected by the transport → encode the connection URI (or take the
//! backend-supplied config) → persist artifacts. Terminal on first failure;
//! no step is retried or compensated. The orchestrator holds no mutable state
//! across requests.

use std::str::FromStr;

use tracing::info;

use relaymint_core::config::Settings;
use relaymint_core::identity::{PANEL_SHORT_ID_LEN, WG_SHORT_ID_LEN};
use relaymint_core::{uri, ClientIdentity, Error, Result};

use crate::panel::{PanelClient, PanelConfig};
use crate::store::{ArtifactPaths, ArtifactStore, QrSource};
use crate::wg::{WgClient, WgClientRecord, WgConfig};

/// Transport kinds a request can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Vless,
    Shadowsocks,
    Wireguard,
}

impl Transport {
    /// Directory family under the users root.
    pub const fn family(self) -> &'static str {
        match self {
            Self::Vless => "vless",
            Self::Shadowsocks => "ss",
            Self::Wireguard => "wg",
        }
    }

    /// Configured short-id bound for this transport family.
    pub const fn short_id_len(self) -> usize {
        match self {
            Self::Wireguard => WG_SHORT_ID_LEN,
            _ => PANEL_SHORT_ID_LEN,
        }
    }
}

impl FromStr for Transport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vless" => Ok(Self::Vless),
            "shadowsocks" | "ss" => Ok(Self::Shadowsocks),
            "wireguard" | "wg" => Ok(Self::Wireguard),
            other => Err(Error::Validation(format!("unknown transport kind: {other:?}"))),
        }
    }
}

/// One provisioning request.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub transport: Transport,
    /// Seeds the short id for panel transports; ignored for WireGuard.
    pub preferred_id: Option<String>,
    /// Display name for the WireGuard backend; required on that path.
    pub name: Option<String>,
}

/// Result of one successful provisioning call.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub short_id: String,
    /// The value that authorizes the connection: a minted UUID for panel
    /// transports, the backend-assigned client id for WireGuard.
    pub credential: String,
    /// Connection URI (panel transports) or rendered config text (WireGuard).
    pub config: String,
    pub paths: ArtifactPaths,
    /// Raw backend client record, WireGuard path only.
    pub wg_record: Option<WgClientRecord>,
}

/// Composes generator, backend clients, encoder, and store per transport.
pub struct Provisioner {
    panel: PanelClient,
    wg: WgClient,
    store: ArtifactStore,
    vless_inbound_id: u64,
    shadowsocks_inbound_id: u64,
}

impl Provisioner {
    pub fn new(
        panel: PanelClient,
        wg: WgClient,
        store: ArtifactStore,
        vless_inbound_id: u64,
        shadowsocks_inbound_id: u64,
    ) -> Self {
        Self {
            panel,
            wg,
            store,
            vless_inbound_id,
            shadowsocks_inbound_id,
        }
    }

    /// Build all components from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let panel = PanelClient::new(&PanelConfig {
            base_url: settings.panel.base_url.clone(),
            username: settings.panel.username.clone(),
            password: settings.panel.password.clone(),
            timeout: std::time::Duration::from_secs(settings.panel.timeout_secs),
        })?;
        let wg = WgClient::new(&WgConfig {
            base_url: settings.wireguard.base_url.clone(),
            api_key: settings.wireguard.api_key.clone(),
            timeout: std::time::Duration::from_secs(settings.wireguard.timeout_secs),
        })?;
        let store = ArtifactStore::new(settings.storage.users_dir.clone());
        Ok(Self::new(
            panel,
            wg,
            store,
            settings.panel.vless_inbound_id,
            settings.panel.shadowsocks_inbound_id,
        ))
    }

    /// Run one provisioning request end to end.
    pub async fn provision(&self, req: &ProvisionRequest) -> Result<Provisioned> {
        match req.transport {
            Transport::Wireguard => self.provision_wireguard(req).await,
            transport => self.provision_panel(transport, req).await,
        }
    }

    /// Panel path: mint → register → encode → persist.
    async fn provision_panel(
        &self,
        transport: Transport,
        req: &ProvisionRequest,
    ) -> Result<Provisioned> {
        let identity =
            ClientIdentity::generate(req.preferred_id.as_deref(), transport.short_id_len());
        info!(
            transport = transport.family(),
            short_id = %identity.short_id,
            "minted client identity"
        );

        let inbound_id = match transport {
            Transport::Vless => self.vless_inbound_id,
            _ => self.shadowsocks_inbound_id,
        };
        let endpoint = self.panel.register_client(inbound_id, &identity).await?;

        let config = match transport {
            Transport::Vless => uri::vless_uri(
                &identity.credential,
                &endpoint.host,
                endpoint.port,
                &identity.short_id,
            )?,
            _ => uri::shadowsocks_uri(
                &identity.credential,
                &endpoint.host,
                endpoint.port,
                &identity.short_id,
            )?,
        };

        let paths = self.store.persist(
            transport.family(),
            &identity.short_id,
            &config,
            QrSource::Uri(&config),
        )?;

        Ok(Provisioned {
            short_id: identity.short_id,
            credential: identity.credential,
            config,
            paths,
            wg_record: None,
        })
    }

    /// WireGuard path: backend mints the record and renders the config.
    async fn provision_wireguard(&self, req: &ProvisionRequest) -> Result<Provisioned> {
        let name = req
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                Error::Validation("wireguard provisioning requires a client name".into())
            })?;

        let out = self.wg.provision_client(name).await?;
        let short_id: String = out
            .record
            .id
            .chars()
            .take(Transport::Wireguard.short_id_len())
            .collect();

        let paths = self.store.persist(
            Transport::Wireguard.family(),
            &short_id,
            &out.config_text,
            QrSource::Image(&out.qr_image),
        )?;

        Ok(Provisioned {
            short_id,
            credential: out.record.id.clone(),
            config: out.config_text,
            paths,
            wg_record: Some(out.record),
        })
    }
}
