//! Opt-in tracing subscriber for hosts that do not install their own.

use tracing_subscriber::EnvFilter;

/// Install a global subscriber filtered by `PULSE_LOG` (default `warn`,
/// keeping the pipeline silent unless asked). Safe to call when the host
/// already installed one; the second install is ignored.
pub fn init() {
    let filter = EnvFilter::try_from_env("PULSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
