//! Asset response assembly

use bytes::Bytes;

use super::error::AssetError;
use crate::image_optimizer::ProcessedImage;
use crate::resolver::Resolution;

/// Client hint headers that influence auto-optimized responses
pub const VARY_CLIENT_HINTS: &str = "Accept, User-Agent, Save-Data, ECT, Downlink, RTT";

/// A complete HTTP response ready to be written to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Bytes,
}

impl AssetResponse {
    /// Successful image response
    ///
    /// `Content-Length` always describes the full representation, also for
    /// HEAD where the body is omitted.
    pub fn image(
        processed: ProcessedImage,
        source_len: usize,
        resolution: &Resolution,
        cache_control: &str,
        head: bool,
    ) -> Self {
        let mut headers = vec![
            ("Content-Type", processed.content_type),
            ("Content-Length", processed.data.len().to_string()),
            ("Cache-Control", cache_control.to_string()),
            ("X-Device-Type", resolution.device.as_str().to_string()),
            ("X-Connection-Type", resolution.connection.as_str().to_string()),
            ("X-Original-Size", source_len.to_string()),
            ("X-Optimized-Size", processed.data.len().to_string()),
        ];

        if resolution.varies_by_client() {
            headers.push(("Vary", VARY_CLIENT_HINTS.to_string()));
        }

        Self {
            status: 200,
            headers,
            body: if head { Bytes::new() } else { processed.data },
        }
    }

    /// JSON error response
    pub fn error(err: AssetError, head: bool) -> Self {
        let body = err.to_json();
        Self {
            status: err.to_http_status(),
            headers: vec![
                ("Content-Type", "application/json".to_string()),
                ("Content-Length", body.len().to_string()),
                ("Cache-Control", "no-store".to_string()),
            ],
            body: if head { Bytes::new() } else { Bytes::from(body) },
        }
    }

    /// Value of the first header named `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_optimizer::{EffectiveTransform, TransformRequest};
    use crate::resolver::{ConnectionClass, DeviceClass};

    fn resolution(auto_optimize: bool) -> Resolution {
        let mut request = TransformRequest::new("u1/img1");
        request.auto_optimize = auto_optimize;
        Resolution {
            request,
            device: DeviceClass::Desktop,
            connection: ConnectionClass::Fast,
            effective: EffectiveTransform::passthrough(80),
        }
    }

    fn processed(data: &'static [u8]) -> ProcessedImage {
        ProcessedImage {
            data: Bytes::from_static(data),
            content_type: "image/webp".to_string(),
            original_size: None,
            output_size: None,
            passthrough: false,
        }
    }

    #[test]
    fn test_image_response_headers() {
        let response = AssetResponse::image(
            processed(b"abcd"),
            10,
            &resolution(false),
            "public, max-age=31536000, immutable",
            false,
        );

        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("image/webp"));
        assert_eq!(response.header("Content-Length"), Some("4"));
        assert_eq!(
            response.header("Cache-Control"),
            Some("public, max-age=31536000, immutable")
        );
        assert_eq!(response.header("X-Device-Type"), Some("desktop"));
        assert_eq!(response.header("X-Connection-Type"), Some("fast"));
        assert_eq!(response.header("X-Original-Size"), Some("10"));
        assert_eq!(response.header("X-Optimized-Size"), Some("4"));
        assert_eq!(response.header("Vary"), None);
        assert_eq!(response.body.as_ref(), b"abcd");
    }

    #[test]
    fn test_vary_when_auto_optimized() {
        let response =
            AssetResponse::image(processed(b"abcd"), 10, &resolution(true), "public", false);
        assert_eq!(response.header("Vary"), Some(VARY_CLIENT_HINTS));
    }

    #[test]
    fn test_head_keeps_length_but_drops_body() {
        let response =
            AssetResponse::image(processed(b"abcd"), 10, &resolution(false), "public", true);
        assert_eq!(response.header("Content-Length"), Some("4"));
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_error_response() {
        let response = AssetResponse::error(AssetError::NotFound, false);
        assert_eq!(response.status, 404);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["error"], "Image not found");
    }
}
