//! RelayMint Provisioning Server
//!
//! HTTP service that mints relay access credentials: registers clients with
//! the panel or WireGuard backend, encodes connection URIs, and persists
//! config + QR artifacts.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use relaymint_core::config::load_settings;
use relaymint_core::tracing_init::init_tracing;
use relaymint_server::provision::Provisioner;
use relaymint_server::routes::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "relaymint-server")]
#[command(version, about = "RelayMint provisioning server - VPN relay credential minting")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:3000", env = "RELAYMINT_ADDR")]
    addr: SocketAddr,

    /// Path to a JSON settings file.
    #[arg(long, env = "RELAYMINT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the artifact root directory.
    #[arg(long)]
    users_dir: Option<PathBuf>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(dir) = args.users_dir {
        settings.storage.users_dir = dir;
    }

    info!(
        addr = %args.addr,
        panel = %settings.panel.base_url,
        wireguard = %settings.wireguard.base_url,
        users_dir = %settings.storage.users_dir.display(),
        "starting relaymint-server"
    );

    let provisioner = Provisioner::from_settings(&settings)?;
    let app = build_router(AppState {
        provisioner: Arc::new(provisioner),
    });

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
