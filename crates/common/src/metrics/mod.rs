//! Metrics and observability utilities
//!
//! Provides Prometheus metrics with latency histograms
//! and standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Newsdesk metrics
pub const METRICS_PREFIX: &str = "newsdesk";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Article listing
    describe_counter!(
        format!("{}_article_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Article listing queries, labelled by whether filters were applied"
    );

    // Search metrics
    describe_counter!(
        format!("{}_search_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of search queries"
    );

    describe_histogram!(
        format!("{}_search_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Search query latency in seconds"
    );

    // Analytics
    describe_histogram!(
        format!("{}_analytics_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Analytics aggregation latency in seconds"
    );

    // Degraded responses
    describe_counter!(
        format!("{}_reports_degraded_total", METRICS_PREFIX),
        Unit::Count,
        "Report listings served empty because the backing query failed"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record article listing metrics
pub fn record_article_query(filtered: bool) {
    counter!(
        format!("{}_article_queries_total", METRICS_PREFIX),
        "filtered" => filtered.to_string()
    )
    .increment(1);
}

/// Helper to record search metrics
pub fn record_search(duration_secs: f64, mode: &str) {
    counter!(
        format!("{}_search_queries_total", METRICS_PREFIX),
        "mode" => mode.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_search_duration_seconds", METRICS_PREFIX),
        "mode" => mode.to_string()
    )
    .record(duration_secs);
}

/// Helper to record analytics aggregation latency
pub fn record_analytics(duration_secs: f64, days: i64) {
    histogram!(
        format!("{}_analytics_duration_seconds", METRICS_PREFIX),
        "days" => days.to_string()
    )
    .record(duration_secs);
}

pub fn record_reports_degraded() {
    counter!(format!("{}_reports_degraded_total", METRICS_PREFIX)).increment(1);
}
