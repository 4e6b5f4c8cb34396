//! # Point Telemetry
//!
//! Logging and metrics for the Merkle-Points workspace.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter`, compact or JSON
//! - **Metrics**: Prometheus counters and histograms in a private registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use point_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::for_service("mp-admin"))?;
//!     // Logs and metrics are now collected
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MP_SERVICE_NAME` | `merkle-points` | Service name in logs |
//! | `MP_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `MP_CONSOLE_OUTPUT` | `true` | Write logs to the console |
//! | `MP_JSON_LOGS` | `false` | JSON log lines |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, HistogramTimer, ACCOUNTS_PER_RECORD, BUILD_DURATION,
    BUILD_FAILURES, LEDGER_RECORDS, LEDGER_TRANSITIONS, RECORDS_BUILT,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// A subscriber installed earlier (by a test harness, say) is kept; metrics
/// already registered are left as they are.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    match init_logging(&config) {
        Ok(()) | Err(TelemetryError::AlreadyInitialized(_)) => {}
        Err(e) => return Err(e),
    }
    if let Err(e) = register_metrics() {
        tracing::debug!(error = %e, "Metrics already registered");
    }
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard held for the lifetime of the process.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// First eight bytes of a hash as hex, for log lines.
pub fn short_hex(bytes: &[u8]) -> String {
    bytes.iter().take(8).map(|b| format!("{:02x}", b)).collect()
}
