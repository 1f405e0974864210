// Proxy module - Pingora ProxyHttp implementation
// Every request is answered in request_filter; nothing is proxied upstream.

use async_trait::async_trait;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_http::ResponseHeader;
use pingora_proxy::{ProxyHttp, Session};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

pub mod helpers;
pub mod special_endpoints;

use crate::assets::{AssetError, AssetRequest, AssetResponse, AssetService};
use crate::metrics::AssetMetrics;
use crate::pipeline::RequestContext;
use special_endpoints::{handle_health, handle_metrics};

/// AssetProxy implements the Pingora ProxyHttp trait
/// Routes built-in endpoints and asset requests to their handlers
pub struct AssetProxy {
    service: Arc<AssetService>,
    /// Proxy start time (for uptime calculation in /health endpoint)
    start_time: Instant,
}

impl AssetProxy {
    pub fn new(service: AssetService) -> Self {
        Self {
            service: Arc::new(service),
            start_time: Instant::now(),
        }
    }

    /// Produce the response for a request without touching the session
    pub async fn route(&self, request: &AssetRequest) -> AssetResponse {
        match request.path.as_str() {
            "/health" => handle_health(self.start_time).into_response(request.is_head()),
            "/metrics" => {
                handle_metrics(AssetMetrics::global()).into_response(request.is_head())
            }
            path if self.service.matches(path) => self.service.handle(request).await,
            _ => AssetResponse::error(AssetError::NotFound, request.is_head()),
        }
    }
}

/// Write a complete response to the client
async fn write_response(session: &mut Session, response: AssetResponse) -> Result<()> {
    let mut header = ResponseHeader::build(response.status, Some(response.headers.len()))?;
    for (name, value) in response.headers {
        header.insert_header(name, value)?;
    }

    let end_of_stream = response.body.is_empty();
    session
        .write_response_header(Box::new(header), end_of_stream)
        .await?;
    if !end_of_stream {
        session
            .write_response_body(Some(response.body), true)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl ProxyHttp for AssetProxy {
    type CTX = RequestContext;

    /// Create a new request context for each incoming request
    fn new_ctx(&self) -> Self::CTX {
        RequestContext::new("GET".to_string(), "/".to_string())
    }

    /// Never reached: request_filter always answers the request
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        Err(pingora_core::Error::explain(
            pingora_core::ErrorType::InternalError,
            "Asset requests are served locally",
        ))
    }

    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let request = helpers::to_asset_request(session.req_header());
        ctx.set_request(&request.method, &request.path);

        let span = tracing::info_span!(
            "request",
            request_id = %ctx.request_id(),
            http.method = %request.method,
            http.target = %request.path,
        );
        let response = self.route(&request).instrument(span).await;

        ctx.set_status(response.status);
        write_response(session, response).await?;

        Ok(true) // Short-circuit (response already sent)
    }

    async fn logging(
        &self,
        _session: &mut Session,
        e: Option<&pingora_core::Error>,
        ctx: &mut Self::CTX,
    ) {
        let duration_ms = ctx.elapsed().as_millis() as u64;

        match e {
            Some(error) => tracing::error!(
                request_id = %ctx.request_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                duration_ms,
                error = %error,
                "Request failed"
            ),
            None => tracing::info!(
                request_id = %ctx.request_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                status = ctx.status().unwrap_or(500),
                duration_ms,
                "Request completed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_optimizer::{ImageConfig, TransformExecutor};
    use crate::origin::{MemoryOrigin, OriginObject};

    fn proxy() -> AssetProxy {
        let origin =
            MemoryOrigin::new().with_object("u1/data", OriginObject::new(b"raw".to_vec(), "image/png"));
        AssetProxy::new(AssetService::new(
            Arc::new(origin),
            TransformExecutor::from_config(ImageConfig::default()),
        ))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = proxy().route(&AssetRequest::get("/health")).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let response = proxy().route(&AssetRequest::get("/metrics")).await;
        assert_eq!(response.status, 200);
        assert_eq!(
            response.header("content-type"),
            Some("text/plain; version=0.0.4")
        );
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = proxy().route(&AssetRequest::get("/elsewhere/u1/img1")).await;
        assert_eq!(response.status, 404);

        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_asset_path_is_delegated() {
        let response = proxy()
            .route(&AssetRequest::get("/assets/u1/data?original=true"))
            .await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body.as_ref(), b"raw");
    }
}
