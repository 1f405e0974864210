// HTTP origin store

use async_trait::async_trait;
use std::time::Duration;

use super::{OriginError, OriginObject, OriginStore};
use crate::constants::DEFAULT_ORIGIN_CONTENT_TYPE;

/// Serves originals from a plain HTTP(S) server at `{base_url}/{key}`
pub struct HttpOrigin {
    base_url: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl HttpOrigin {
    /// Create an HTTP origin
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created (e.g. TLS
    /// configuration issues).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, String> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            http_client,
        })
    }

    /// URL of `key`; every segment is percent-encoded so `?` and `#` stay
    /// part of the path
    pub fn url_for(&self, key: &str) -> String {
        let path = key
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl OriginStore for HttpOrigin {
    async fn fetch(&self, key: &str) -> Result<OriginObject, OriginError> {
        let url = self.url_for(key);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OriginError::Timeout {
                        key: key.to_string(),
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    OriginError::upstream(format!("HTTP fetch failed: {e}"))
                }
            })?;

        // Any non-success answer means the object is unavailable
        let status = response.status();
        if !status.is_success() {
            if status != reqwest::StatusCode::NOT_FOUND {
                tracing::warn!(url = %url, status = status.as_u16(), "Origin returned non-success status");
            }
            return Err(OriginError::NotFound {
                key: key.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_ORIGIN_CONTENT_TYPE.to_string());

        let data = response
            .bytes()
            .await
            .map_err(|e| OriginError::upstream(format!("Failed to read HTTP body: {e}")))?;

        tracing::debug!(url = %url, bytes = data.len(), "Fetched object over HTTP");

        Ok(OriginObject { data, content_type })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
