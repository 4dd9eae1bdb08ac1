//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

use crate::Environment;

/// Initialize tracing/logging for the process.
///
/// `RUST_LOG` overrides the environment's default level. Safe to call
/// multiple times (subsequent calls are no-ops).
pub fn init(env: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env.default_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let _ = if env.json_output() {
        builder.json().with_target(false).try_init()
    } else {
        builder.with_target(true).try_init()
    };

    tracing::debug!(environment = %env, "logging initialized");
}
