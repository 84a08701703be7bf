//! Tracing setup: structured logging for query resolution.
//!
//! Spans: `concord.initialize_query` per top-level query and
//! `concord.query` per (possibly delegated) query call.

use tracing_subscriber::EnvFilter;

use concord_core::config::ObservabilityConfig;

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "CONCORD_LOG";

/// Install the global subscriber.
///
/// `CONCORD_LOG` takes precedence over `config.log_level`. Returns `false`
/// if a global subscriber was already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

/// Install a subscriber with a custom filter string (for tests or embedding).
pub fn init_tracing_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .with_test_writer()
        .try_init()
        .is_ok()
}
