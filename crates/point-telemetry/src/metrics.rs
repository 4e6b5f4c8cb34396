//! Prometheus metrics for the builder and the devnet ledger.
//!
//! All metrics follow the naming convention: `mp_<component>_<metric>_<unit>`
//!
//! The validator records nothing itself; ledger hosts count its outcomes.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Workspace metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BUILDER METRICS
    // =========================================================================

    /// Update records successfully built
    pub static ref RECORDS_BUILT: Counter = Counter::new(
        "mp_builder_records_built_total",
        "Total number of update records built"
    ).expect("metric creation failed");

    /// Build failures by reason
    pub static ref BUILD_FAILURES: CounterVec = CounterVec::new(
        Opts::new("mp_builder_failures_total", "Update builds aborted, by reason"),
        &["reason"]  // reason: inconsistent/prior_root/empty/too_many/stale/self_check/proof/codec/source
    ).expect("metric creation failed");

    /// Accounts per built record
    pub static ref ACCOUNTS_PER_RECORD: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "mp_builder_accounts_per_record",
            "Number of account updates carried by each built record"
        ).buckets(exponential_buckets(1.0, 2.0, 11).expect("bucket layout"))
    ).expect("metric creation failed");

    /// Time spent building one record
    pub static ref BUILD_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "mp_builder_build_duration_seconds",
            "Time spent computing roots and proof for one record"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).expect("bucket layout"))
    ).expect("metric creation failed");

    // =========================================================================
    // LEDGER METRICS
    // =========================================================================

    /// Submitted transitions by outcome
    pub static ref LEDGER_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("mp_ledger_transitions_total", "Submitted transitions, by validator outcome"),
        &["outcome"]  // outcome: accepted/missing_record/old_state_invalid/new_state_invalid/dead_input
    ).expect("metric creation failed");

    /// Live commitment records
    pub static ref LEDGER_RECORDS: Gauge = Gauge::new(
        "mp_ledger_records",
        "Number of live commitment records"
    ).expect("metric creation failed");
}

/// Register all metrics with [`REGISTRY`].
///
/// Calling twice returns an error from the second registration.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Builder
        Box::new(RECORDS_BUILT.clone()),
        Box::new(BUILD_FAILURES.clone()),
        Box::new(ACCOUNTS_PER_RECORD.clone()),
        Box::new(BUILD_DURATION.clone()),
        // Ledger
        Box::new(LEDGER_TRANSITIONS.clone()),
        Box::new(LEDGER_RECORDS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
}

/// Render every registered metric in the Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
