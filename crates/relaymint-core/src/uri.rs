//! Connection URI encoders.
//!
//! Pure, deterministic formatting of the connection URI a client app scans or
//! pastes. The query constants are fixed for this relay fleet; there is no
//! negotiation. WireGuard has no encoder here because its backend returns
//! complete config text directly.

use base64::{engine::general_purpose, Engine as _};

use crate::error::{Error, Result};

/// Pinned Shadowsocks cipher for the whole fleet.
pub const SS_METHOD: &str = "aes-128-gcm";

fn check_endpoint(host: &str, port: u16) -> Result<()> {
    if host.is_empty() {
        return Err(Error::Encoding("relay host is empty".into()));
    }
    if port == 0 {
        return Err(Error::Encoding("relay port is zero".into()));
    }
    Ok(())
}

/// Encode a VLESS connection URI.
///
/// `vless://{credential}@{host}:{port}?encryption=none&security=reality#{label}`
pub fn vless_uri(credential: &str, host: &str, port: u16, label: &str) -> Result<String> {
    check_endpoint(host, port)?;
    Ok(format!(
        "vless://{credential}@{host}:{port}?encryption=none&security=reality#{label}"
    ))
}

/// Encode a Shadowsocks connection URI.
///
/// The inner string `{method}:{credential}@{host}:{port}` is base64-encoded
/// with the standard alphabet (padded; consumers tolerate either form):
/// `ss://{base64}#{label}`
pub fn shadowsocks_uri(credential: &str, host: &str, port: u16, label: &str) -> Result<String> {
    check_endpoint(host, port)?;
    let inner = format!("{SS_METHOD}:{credential}@{host}:{port}");
    let encoded = general_purpose::STANDARD.encode(inner.as_bytes());
    Ok(format!("ss://{encoded}#{label}"))
}
