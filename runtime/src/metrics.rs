//! Prometheus metrics for store observability.
//!
//! Every [`Store`](crate::Store) with metrics enabled records:
//! - actions processed, per store and action name
//! - actions rejected by the reducer
//! - reducer execution time
//! - the version of the latest published snapshot
//!
//! Recording is a no-op until a recorder is installed, e.g. with
//! [`PrometheusMetrics::install`].
//!
//! # Example
//!
//! ```rust,no_run
//! use snapstore_runtime::metrics::PrometheusMetrics;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::install()?;
//!
//! // ... send actions to stores ...
//!
//! if let Some(text) = metrics.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use snapstore_core::snapshot::Version;
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// In-process Prometheus recorder.
///
/// Metrics are kept in memory and rendered in the Prometheus text format on
/// demand.
pub struct PrometheusMetrics {
    handle: Option<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Register metric descriptions and install the global recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., in tests), the returned value
    /// has no handle and [`render`](Self::render) returns `None`; recording
    /// keeps working through the existing recorder.
    pub fn install() -> Result<Self, MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_001, 0.000_01, 0.000_1, 0.001, 0.005, 0.01, 0.05, 0.1,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                tracing::info!("Prometheus metrics recorder installed");
                Ok(Self {
                    handle: Some(handle),
                })
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(Self { handle: None })
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this instance did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!(
        "store_actions_processed_total",
        "Total number of actions sent to stores"
    );
    describe_counter!(
        "store_actions_rejected_total",
        "Total number of actions rejected by reducers"
    );
    describe_histogram!(
        "store_reducer_duration_seconds",
        "Time taken to run the reducer for one action"
    );
    describe_gauge!(
        "store_snapshot_version",
        "Version of the latest published snapshot"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record an action processed.
    pub fn record_action(store: &str, action: &'static str, duration: Duration) {
        counter!(
            "store_actions_processed_total",
            "store" => store.to_string(),
            "action" => action
        )
        .increment(1);
        histogram!("store_reducer_duration_seconds", "store" => store.to_string())
            .record(duration.as_secs_f64());
    }

    /// Record an action the reducer rejected.
    pub fn record_rejection(store: &str, action: &'static str) {
        counter!(
            "store_actions_rejected_total",
            "store" => store.to_string(),
            "action" => action
        )
        .increment(1);
    }

    /// Record the version of a newly published snapshot.
    #[allow(clippy::cast_precision_loss)] // Versions stay far below 2^52
    pub fn record_version(store: &str, version: Version) {
        gauge!("store_snapshot_version", "store" => store.to_string()).set(version.value() as f64);
    }
}
