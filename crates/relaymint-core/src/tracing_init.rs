//! Tracing/logging initialization.
//!
//! The server binary logs at component boundaries (identity minting,
//! registration, persistence); this sets up the subscriber those events flow
//! into, honoring `RUST_LOG` and falling back to the RelayMint crates at
//! `info`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default `RUST_LOG` filter covering the RelayMint crates.
pub const DEFAULT_FILTER: &str = "relaymint_server=info,relaymint_core=info";

/// Initialise the global tracing subscriber.
///
/// `log_json` switches the human-readable format to structured JSON lines
/// (for log aggregation).
pub fn init_tracing(log_json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.into()),
    );
    let registry = tracing_subscriber::registry().with(env_filter);
    if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_a_valid_env_filter() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn default_filter_covers_both_crates() {
        assert!(DEFAULT_FILTER.contains("relaymint_server"));
        assert!(DEFAULT_FILTER.contains("relaymint_core"));
    }
}
