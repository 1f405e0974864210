// Metrics module - Prometheus metrics for the asset pipeline
//
// Provides:
// - Request outcome counters (ok, not_found, processing_failure, ...)
// - Passthrough counter
// - Transform duration histogram by output format
// - Byte counters for origin input and response output

use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder, HistogramVec,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;
use std::time::Duration;

/// Outcome label attached to every handled asset request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Ok,
    NotFound,
    ProcessingFailure,
    UpstreamTimeout,
    UpstreamError,
    MethodNotAllowed,
}

impl RequestOutcome {
    pub fn as_label(&self) -> &'static str {
        match self {
            RequestOutcome::Ok => "ok",
            RequestOutcome::NotFound => "not_found",
            RequestOutcome::ProcessingFailure => "processing_failure",
            RequestOutcome::UpstreamTimeout => "upstream_timeout",
            RequestOutcome::UpstreamError => "upstream_error",
            RequestOutcome::MethodNotAllowed => "method_not_allowed",
        }
    }
}

/// Global metrics registry for asset delivery
pub struct AssetMetrics {
    /// Requests by outcome
    pub requests: IntCounterVec,

    /// Responses served with the untouched origin bytes
    pub passthrough: IntCounter,

    /// Decode/resize/encode duration in seconds, labelled by output content type
    pub transform_duration: HistogramVec,

    /// Bytes received from the origin
    pub origin_bytes: IntCounter,

    /// Body bytes sent to clients
    pub response_bytes: IntCounter,
}

/// Global singleton instance of metrics
static METRICS: OnceLock<AssetMetrics> = OnceLock::new();

impl AssetMetrics {
    /// Initialize and return the global metrics instance
    ///
    /// Subsequent calls return the same instance.
    pub fn global() -> &'static Self {
        METRICS.get_or_init(|| {
            let requests = register_int_counter_vec!(
                "shirasagi_asset_requests_total",
                "Total number of asset requests by outcome",
                &["outcome"]
            )
            .expect("Failed to register asset_requests_total metric");

            let passthrough = register_int_counter!(
                "shirasagi_passthrough_total",
                "Responses served with the original bytes"
            )
            .expect("Failed to register passthrough_total metric");

            let transform_duration = register_histogram_vec!(
                "shirasagi_transform_duration_seconds",
                "Duration of image transformations in seconds",
                &["content_type"],
                vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0] // 1ms to 5s
            )
            .expect("Failed to register transform_duration_seconds metric");

            let origin_bytes = register_int_counter!(
                "shirasagi_origin_bytes_total",
                "Bytes fetched from the origin store"
            )
            .expect("Failed to register origin_bytes_total metric");

            let response_bytes = register_int_counter!(
                "shirasagi_response_bytes_total",
                "Response body bytes sent to clients"
            )
            .expect("Failed to register response_bytes_total metric");

            AssetMetrics {
                requests,
                passthrough,
                transform_duration,
                origin_bytes,
                response_bytes,
            }
        })
    }

    pub fn record_outcome(&self, outcome: RequestOutcome) {
        self.requests.with_label_values(&[outcome.as_label()]).inc();
    }

    pub fn outcome_count(&self, outcome: RequestOutcome) -> u64 {
        self.requests.with_label_values(&[outcome.as_label()]).get()
    }

    /// Record how long a transformation producing `content_type` took
    pub fn observe_transform(&self, content_type: &str, elapsed: Duration) {
        self.transform_duration
            .with_label_values(&[content_type])
            .observe(elapsed.as_secs_f64());
    }

    /// Export every registered metric in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
            tracing::warn!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
