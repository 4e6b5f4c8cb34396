//! Structured logging.
//!
//! JSON lines carry consistent fields so they can be shipped and queried:
//! - `timestamp`, `level`, `target`
//! - `service`: from [`TelemetryConfig::service_name`]
//! - `component`: set by [`log_event!`](crate::log_event)
//! - additional event fields

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber. Events go to stderr.
///
/// Fails with [`TelemetryError::AlreadyInitialized`] when a subscriber is
/// already set, which callers that may initialise twice can ignore.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log level '{}': {}", config.log_level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match (config.console_output, config.json_logs) {
        (false, _) => registry.try_init(),
        (true, true) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        (true, false) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .compact()
                    .with_target(true)
                    .with_ansi(true),
            )
            .try_init(),
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}

/// Emit an event tagged with the component that produced it.
///
/// ```rust,ignore
/// log_event!(info, "builder", "Record built", accounts = 3);
/// ```
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a commitment transition with its two roots rendered as hex.
#[macro_export]
macro_rules! log_transition {
    ($level:ident, $component:expr, $msg:expr, $old_root:expr, $new_root:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            old_root = %$crate::short_hex(&$old_root),
            new_root = %$crate::short_hex(&$new_root),
            $($($field)*,)?
            $msg
        )
    };
}
