//! Asset delivery
//!
//! Request flow: resolve parameters → fetch from origin (time-bounded) →
//! transform off the async workers → assemble the response.
//!
//! Every failure terminates the request with a JSON error; no partial image
//! is ever returned.

pub mod error;
pub mod request;
pub mod response;

pub use error::AssetError;
pub use request::{parse_query_string, storage_key, AssetRequest};
pub use response::{AssetResponse, VARY_CLIENT_HINTS};

use bytes::Bytes;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::constants::{DEFAULT_CACHE_CONTROL, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_ROUTE_PREFIX};
use crate::image_optimizer::{
    EffectiveTransform, ImageCodec, ImageError, ProcessedImage, RasterCodec, TransformExecutor,
};
use crate::metrics::{AssetMetrics, RequestOutcome};
use crate::origin::{fetch_with_timeout, OriginStore};
use crate::resolver::resolve;

/// Serves transformed images for paths under the route prefix
pub struct AssetService<C = RasterCodec> {
    origin: Arc<dyn OriginStore>,
    executor: Arc<TransformExecutor<C>>,
    route_prefix: String,
    fetch_timeout: Duration,
    cache_control: String,
}

impl AssetService<RasterCodec> {
    pub fn from_config(config: &Config, origin: Arc<dyn OriginStore>) -> Self {
        Self::new(origin, TransformExecutor::from_config(config.image.clone()))
            .with_route_prefix(&config.server.route_prefix)
            .with_fetch_timeout(Duration::from_millis(config.origin.fetch_timeout_ms))
            .with_cache_control(&config.image.cache_control)
    }
}

impl<C: ImageCodec + 'static> AssetService<C> {
    pub fn new(origin: Arc<dyn OriginStore>, executor: TransformExecutor<C>) -> Self {
        Self {
            origin,
            executor: Arc::new(executor),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            cache_control: DEFAULT_CACHE_CONTROL.to_string(),
        }
    }

    pub fn with_route_prefix(mut self, route_prefix: &str) -> Self {
        self.route_prefix = route_prefix.trim_end_matches('/').to_string();
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn with_cache_control(mut self, cache_control: &str) -> Self {
        self.cache_control = cache_control.to_string();
        self
    }

    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    /// Whether `path` falls under the route prefix
    pub fn matches(&self, path: &str) -> bool {
        path.strip_prefix(&self.route_prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Handle one request; never fails, errors become JSON responses
    pub async fn handle(&self, request: &AssetRequest) -> AssetResponse {
        let metrics = AssetMetrics::global();

        let response = match self.serve(request).await {
            Ok(response) => {
                metrics.record_outcome(RequestOutcome::Ok);
                response
            }
            Err(err) => {
                metrics.record_outcome(err.outcome());
                AssetResponse::error(err, request.is_head())
            }
        };

        metrics.response_bytes.inc_by(response.body.len() as u64);
        response
    }

    async fn serve(&self, request: &AssetRequest) -> Result<AssetResponse, AssetError> {
        if request.method != "GET" && request.method != "HEAD" {
            return Err(AssetError::MethodNotAllowed);
        }

        let key = storage_key(&request.path, &self.route_prefix).ok_or_else(|| {
            tracing::debug!(path = %request.path, "Path does not name a storage key");
            AssetError::NotFound
        })?;

        let resolution = resolve(&key, &request.query, &request.headers);
        tracing::debug!(
            key = %key,
            device = resolution.device.as_str(),
            connection = resolution.connection.as_str(),
            format = resolution.effective.format.as_str(),
            quality = resolution.effective.quality,
            width = ?resolution.effective.width,
            height = ?resolution.effective.height,
            "Resolved transform"
        );

        let object = fetch_with_timeout(self.origin.as_ref(), &key, self.fetch_timeout)
            .await
            .map_err(|e| {
                tracing::info!(key = %key, error = %e, "Origin fetch failed");
                AssetError::from(e)
            })?;

        if object.data.is_empty() {
            tracing::info!(key = %key, "Origin returned an empty body");
            return Err(AssetError::NotFound);
        }

        let metrics = AssetMetrics::global();
        let source_len = object.data.len();
        metrics.origin_bytes.inc_by(source_len as u64);

        let started = Instant::now();
        let processed = self
            .transform(object.data, object.content_type, &resolution.effective)
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "Image processing failed");
                AssetError::from(e)
            })?;

        if processed.passthrough {
            metrics.passthrough.inc();
        } else {
            metrics.observe_transform(&processed.content_type, started.elapsed());
        }

        tracing::info!(
            key = %key,
            content_type = %processed.content_type,
            passthrough = processed.passthrough,
            original_bytes = source_len,
            output_bytes = processed.data.len(),
            original_size = ?processed.original_size,
            output_size = ?processed.output_size,
            duration_ms = started.elapsed().as_millis() as u64,
            "Served asset"
        );

        Ok(AssetResponse::image(
            processed,
            source_len,
            &resolution,
            &self.cache_control,
            request.is_head(),
        ))
    }

    /// Passthrough runs inline; codec work goes to the blocking pool
    async fn transform(
        &self,
        source: Bytes,
        content_type: String,
        effective: &EffectiveTransform,
    ) -> Result<ProcessedImage, ImageError> {
        if effective.is_passthrough() {
            return self.executor.execute(source, &content_type, effective);
        }

        let executor = Arc::clone(&self.executor);
        let effective = *effective;
        tokio::task::spawn_blocking(move || executor.execute(source, &content_type, &effective))
            .await
            .map_err(|e| ImageError::TaskFailed {
                message: e.to_string(),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_optimizer::ImageConfig;
    use crate::origin::MemoryOrigin;

    fn service() -> AssetService {
        AssetService::new(
            Arc::new(MemoryOrigin::new()),
            TransformExecutor::from_config(ImageConfig::default()),
        )
    }

    #[test]
    fn test_matches_route_prefix() {
        let service = service();
        assert!(service.matches("/assets"));
        assert!(service.matches("/assets/u1/img1"));
        assert!(!service.matches("/assetsx/u1"));
        assert!(!service.matches("/health"));
    }

    #[test]
    fn test_custom_route_prefix() {
        let service = service().with_route_prefix("/img/");
        assert_eq!(service.route_prefix(), "/img");
        assert!(service.matches("/img/u1/img1"));
        assert!(!service.matches("/assets/u1/img1"));
    }

    #[tokio::test]
    async fn test_post_is_rejected() {
        let response = service()
            .handle(&AssetRequest::parse("POST", "/assets/u1/img1"))
            .await;
        assert_eq!(response.status, 405);
    }

    #[tokio::test]
    async fn test_empty_key_is_not_found() {
        let response = service().handle(&AssetRequest::get("/assets/")).await;
        assert_eq!(response.status, 404);
    }
}
