//! `RelayMint` Core Library
//!
//! Shared functionality for `RelayMint` components:
//! - Error taxonomy for provisioning failures
//! - Configuration resolution (file + environment)
//! - Short-id / credential minting
//! - Protocol connection URI encoding

pub mod config;
pub mod error;
pub mod identity;
pub mod tracing_init;
pub mod uri;

pub use config::Settings;
pub use error::{Error, Result};
pub use identity::ClientIdentity;
