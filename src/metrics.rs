//! Prometheus metrics for chart rendering and dataset loading.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Chart render latency metric name (callback + rasterize + encode).
pub const METRIC_RENDER_LATENCY: &str = "chart_render_latency_ms";
/// Encoded PNG size metric name.
pub const METRIC_PNG_BYTES: &str = "chart_png_bytes";
/// Dataset fetch latency metric name.
pub const METRIC_DATASET_FETCH_LATENCY: &str = "dataset_fetch_latency_ms";
/// Charts rendered counter metric name.
pub const METRIC_CHARTS_RENDERED: &str = "charts_rendered_total";
/// Render failures counter metric name.
pub const METRIC_RENDER_FAILURES: &str = "chart_render_failures_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_RENDER_LATENCY,
        "End-to-end chart render latency in milliseconds"
    );
    describe_histogram!(METRIC_PNG_BYTES, "Encoded PNG size in bytes");
    describe_histogram!(
        METRIC_DATASET_FETCH_LATENCY,
        "Startup dataset fetch latency in milliseconds"
    );

    describe_counter!(METRIC_CHARTS_RENDERED, "Total number of charts rendered");
    describe_counter!(
        METRIC_RENDER_FAILURES,
        "Total number of chart renders that failed"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder and return the handle used by the
/// /metrics endpoint.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record end-to-end render latency for one chart.
pub fn record_render_latency(start: Instant, chart: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_RENDER_LATENCY, "chart" => chart).record(latency_ms);
}

/// Record the encoded PNG size for one chart.
pub fn record_png_bytes(chart: &'static str, bytes: usize) {
    histogram!(METRIC_PNG_BYTES, "chart" => chart).record(bytes as f64);
}

/// Increment the rendered-charts counter.
pub fn inc_charts_rendered(chart: &'static str) {
    counter!(METRIC_CHARTS_RENDERED, "chart" => chart).increment(1);
}

/// Increment the render-failures counter.
pub fn inc_render_failures(chart: &'static str) {
    counter!(METRIC_RENDER_FAILURES, "chart" => chart).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for the startup dataset fetch.
pub fn timer_dataset_fetch() -> LatencyTimer {
    LatencyTimer::new(METRIC_DATASET_FETCH_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = LatencyTimer::new("test_metric");
        sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 9.0); // Allow some tolerance
        // Timer will record on drop
    }
}
