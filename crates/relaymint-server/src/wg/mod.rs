//! WireGuard backend (wg-easy family) integration.
//!
//! Unlike the panel transports, this backend mints the client record itself
//! and hands back fully rendered config text plus a QR image; no local URI
//! encoding happens on this path.

mod client;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::{WgClient, WgConfig, WgProvisioned};
pub use types::WgClientRecord;
