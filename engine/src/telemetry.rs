//! Telemetry and Observability
//!
//! Sets up `tracing-subscriber` for structured logging. The log level
//! comes from configuration, with `RUST_LOG` taking precedence when set.
//! Debug builds get pretty terminal output; release builds emit JSON.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber with the given log level from config.
///
/// Priority: `RUST_LOG` env var > `log_level` parameter.
///
/// Safe to call more than once; later calls are no-ops. The session
/// calls this early with the default level, then again once the
/// configured level is known.
pub fn init_telemetry_with_level(log_level: &str) {
    let default_filter = format!("{},lingo_engine={}", log_level, log_level);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    #[cfg(debug_assertions)]
    let format_layer = fmt::layer().pretty().with_target(false);

    #[cfg(not(debug_assertions))]
    let format_layer = fmt::layer().json().with_current_span(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(format_layer)
        .try_init()
        .ok();
}

/// Initialize the tracing subscriber before configuration is available.
///
/// Falls back to "info" level if no `RUST_LOG` env var is set.
pub fn init_telemetry() {
    init_telemetry_with_level("info");
}
