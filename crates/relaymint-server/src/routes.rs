//! HTTP intake routes.
//!
//! Thin adapters over the orchestrator. Success and failure both come back as
//! JSON: `{success: true, …}` or `{success: false, message}`; failure bodies
//! carry the error's display text, never a raw panic or stack.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use relaymint_core::Error;

use crate::provision::{ProvisionRequest, Provisioned, Provisioner, Transport};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub provisioner: Arc<Provisioner>,
}

/// Build the intake router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/users", post(add_panel_user))
        .route("/api/wg/users", post(add_wg_user))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// `POST /api/users` request body. `inboundType` is the legacy key name.
#[derive(Debug, Deserialize)]
struct PanelUserRequest {
    #[serde(alias = "inboundType")]
    transport: Option<String>,
    #[serde(rename = "preferredId")]
    preferred_id: Option<String>,
}

/// `POST /api/wg/users` request body.
#[derive(Debug, Deserialize)]
struct WgUserRequest {
    name: Option<String>,
}

/// `POST /api/users` — provision a VLESS or Shadowsocks client.
async fn add_panel_user(
    State(state): State<AppState>,
    Json(body): Json<PanelUserRequest>,
) -> Response {
    let result = async {
        let kind = body
            .transport
            .as_deref()
            .ok_or_else(|| Error::Validation("missing transport kind".into()))?;
        let transport = Transport::from_str(kind)?;
        if transport == Transport::Wireguard {
            return Err(Error::Validation(
                "wireguard clients are provisioned via /api/wg/users".into(),
            ));
        }
        state
            .provisioner
            .provision(&ProvisionRequest {
                transport,
                preferred_id: body.preferred_id,
                name: None,
            })
            .await
    }
    .await;
    respond(result)
}

/// `POST /api/wg/users` — provision a WireGuard client by display name.
async fn add_wg_user(State(state): State<AppState>, Json(body): Json<WgUserRequest>) -> Response {
    let result = state
        .provisioner
        .provision(&ProvisionRequest {
            transport: Transport::Wireguard,
            preferred_id: None,
            name: body.name,
        })
        .await;
    respond(result)
}

fn respond(result: Result<Provisioned, Error>) -> Response {
    match result {
        Ok(p) => success_body(&p).into_response(),
        Err(err) => {
            warn!(error = %err, "provisioning request failed");
            let status = status_for(&err);
            (status, Json(json!({ "success": false, "message": err.to_string() })))
                .into_response()
        }
    }
}

fn success_body(p: &Provisioned) -> Json<serde_json::Value> {
    let mut body = json!({
        "success": true,
        "id": p.short_id,
        "credential": p.credential,
        "config": p.config,
        "files": {
            "configPath": p.paths.config_path,
            "qrPath": p.paths.qr_path,
        },
    });
    if let (Some(record), Some(map)) = (&p.wg_record, body.as_object_mut()) {
        if let Ok(raw) = serde_json::to_value(record) {
            map.insert("client".to_string(), raw);
        }
    }
    Json(body)
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::BackendNotFound(_) => StatusCode::NOT_FOUND,
        Error::BackendAuth(_) | Error::BackendRejected { .. } | Error::BackendUnavailable(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
