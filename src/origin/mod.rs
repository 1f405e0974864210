//! Origin store access
//!
//! The origin holds the stored original images. It is consulted once per
//! request: `fetch(key)` returns the bytes and the declared content type,
//! or `NotFound`.

pub mod http;
pub mod memory;
pub mod s3;

pub use http::HttpOrigin;
pub use memory::MemoryOrigin;
pub use s3::S3Origin;

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{OriginBackend, OriginConfig};

/// An object as stored at the origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginObject {
    pub data: Bytes,
    /// Declared content type, `application/octet-stream` when the origin has none
    pub content_type: String,
}

impl OriginObject {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum OriginError {
    /// The origin has no object at this key or refused to serve it
    #[error("Object not found: {key}")]
    NotFound { key: String },

    /// The fetch did not complete within the configured bound
    #[error("Fetching '{key}' timed out after {timeout_ms}ms")]
    Timeout { key: String, timeout_ms: u64 },

    /// Transport failure before any answer, or an unreadable body
    #[error("Origin request failed: {message}")]
    Upstream { message: String },
}

impl OriginError {
    pub fn upstream(message: impl Into<String>) -> Self {
        OriginError::Upstream {
            message: message.into(),
        }
    }
}

/// Read-only access to stored originals
#[async_trait]
pub trait OriginStore: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<OriginObject, OriginError>;

    /// Backend name used in logs
    fn name(&self) -> &'static str;
}

/// Fetch `key`, failing with [`OriginError::Timeout`] if the store does not
/// answer within `timeout`
pub async fn fetch_with_timeout(
    store: &dyn OriginStore,
    key: &str,
    timeout: Duration,
) -> Result<OriginObject, OriginError> {
    match tokio::time::timeout(timeout, store.fetch(key)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                origin = store.name(),
                key = %key,
                timeout_ms = timeout.as_millis() as u64,
                "Origin fetch timed out"
            );
            Err(OriginError::Timeout {
                key: key.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }
}

/// Construct the configured origin store
pub fn build_origin(config: &OriginConfig) -> Result<Arc<dyn OriginStore>, String> {
    let store: Arc<dyn OriginStore> = match &config.backend {
        OriginBackend::S3 {
            bucket,
            region,
            access_key,
            secret_key,
            endpoint,
            key_prefix,
        } => Arc::new(S3Origin::new(
            bucket,
            region,
            access_key.as_deref().zip(secret_key.as_deref()),
            endpoint.as_deref(),
            key_prefix.clone(),
        )),
        OriginBackend::Http { base_url } => Arc::new(HttpOrigin::new(
            base_url,
            Duration::from_millis(config.fetch_timeout_ms),
        )?),
        OriginBackend::Memory { seed_dir } => match seed_dir {
            Some(dir) => Arc::new(MemoryOrigin::from_dir(dir)?),
            None => Arc::new(MemoryOrigin::new()),
        },
    };

    tracing::info!(origin = store.name(), "Origin store configured");
    Ok(store)
}

/// Guess a content type from a key's file extension
pub(crate) fn content_type_for_key(key: &str) -> &'static str {
    let extension = key
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        _ => crate::constants::DEFAULT_ORIGIN_CONTENT_TYPE,
    }
}
