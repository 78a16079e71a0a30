//! Relay panel (3x-ui family) integration.
//!
//! Provides a reqwest-based client that logs into the panel, fetches an
//! inbound's configuration blob, appends a client entry to its settings, and
//! pushes the whole object back.

mod client;
pub mod types;


pub use client::{PanelClient, PanelConfig, RelayEndpoint};
pub use types::{ClientEntry, InboundSettings, PanelEnvelope};
