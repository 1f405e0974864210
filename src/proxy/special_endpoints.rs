//! Special endpoint handlers for the proxy.
//!
//! This module provides response generators for built-in endpoints:
//! - `/health` - Health check endpoint
//! - `/metrics` - Prometheus metrics export
//!
//! Functions return `EndpointResponse` instead of writing directly to the
//! session so response generation stays testable.

use bytes::Bytes;
use std::time::Instant;

use crate::assets::AssetResponse;
use crate::metrics::AssetMetrics;

/// Response from a special endpoint handler.
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value
    pub content_type: &'static str,
    /// Response body
    pub body: String,
}

impl EndpointResponse {
    /// Create a JSON response with the given status and body.
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    /// Create a plain text response (for Prometheus metrics).
    pub fn prometheus(body: String) -> Self {
        Self {
            status: 200,
            content_type: "text/plain; version=0.0.4",
            body,
        }
    }

    /// Convert into a writable response; HEAD keeps the headers only
    pub fn into_response(self, head: bool) -> AssetResponse {
        AssetResponse {
            status: self.status,
            headers: vec![
                ("Content-Type", self.content_type.to_string()),
                ("Content-Length", self.body.len().to_string()),
                ("Cache-Control", "no-store".to_string()),
            ],
            body: if head {
                Bytes::new()
            } else {
                Bytes::from(self.body)
            },
        }
    }
}

/// Generate response for /health endpoint.
///
/// Returns health status with uptime and version information.
pub fn handle_health(start_time: Instant) -> EndpointResponse {
    let uptime_seconds = start_time.elapsed().as_secs();
    let version = env!("CARGO_PKG_VERSION");

    let body = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "version": version
    })
    .to_string();

    EndpointResponse::json(200, body)
}

/// Generate response for /metrics endpoint.
pub fn handle_metrics(metrics: &AssetMetrics) -> EndpointResponse {
    EndpointResponse::prometheus(metrics.export_prometheus())
}
