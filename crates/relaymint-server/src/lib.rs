//! RelayMint Provisioning Server Library
//!
//! Core functionality for the RelayMint server:
//! - Panel registration client (3x-ui family inbound read-modify-write)
//! - WireGuard backend adapter (wg-easy family)
//! - Artifact store for config files and QR images
//! - Provisioning orchestrator composing the above per transport
//! - HTTP intake routes
//!
//! Operational note: a backend registration that succeeds but whose artifact
//! persistence fails is NOT rolled back. The registered client stays usable
//! on the relay even when local files are missing; operators reconcile such
//! cases manually.

pub mod panel;
pub mod provision;
pub mod routes;
pub mod store;
pub mod wg;

pub(crate) mod net;
