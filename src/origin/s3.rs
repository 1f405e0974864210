// S3 origin store

use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::Client;
use tokio::sync::OnceCell;

use super::{OriginError, OriginObject, OriginStore};
use crate::constants::DEFAULT_ORIGIN_CONTENT_TYPE;

/// Serves originals from an S3 (or S3-compatible) bucket
///
/// The SDK client is built on first use so that credential resolution runs
/// on the server's runtime.
pub struct S3Origin {
    bucket: String,
    region: String,
    credentials: Option<(String, String)>,
    endpoint: Option<String>,
    key_prefix: Option<String>,
    client: OnceCell<Client>,
}

impl S3Origin {
    pub fn new(
        bucket: &str,
        region: &str,
        credentials: Option<(&str, &str)>,
        endpoint: Option<&str>,
        key_prefix: Option<String>,
    ) -> Self {
        tracing::debug!(bucket = %bucket, region = %region, "Initializing S3 origin");

        Self {
            bucket: bucket.to_string(),
            region: region.to_string(),
            credentials: credentials.map(|(access, secret)| (access.to_string(), secret.to_string())),
            endpoint: endpoint.map(str::to_string),
            key_prefix,
            client: OnceCell::new(),
        }
    }

    /// Full object key for a storage key
    pub fn object_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) if !prefix.is_empty() => {
                format!("{}/{}", prefix.trim_end_matches('/'), key)
            }
            _ => key.to_string(),
        }
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(aws_config::Region::new(self.region.clone()))
                    .load()
                    .await;

                let mut builder = aws_sdk_s3::config::Builder::from(&shared);

                // Custom endpoints (MinIO, R2) need path-style addressing
                if let Some(endpoint) = &self.endpoint {
                    builder = builder.endpoint_url(endpoint).force_path_style(true);
                }

                if let Some((access_key, secret_key)) = &self.credentials {
                    let credentials =
                        Credentials::new(access_key, secret_key, None, None, "shirasagi-config");
                    builder = builder.credentials_provider(credentials);
                }

                Client::from_conf(builder.build())
            })
            .await
    }
}

#[async_trait]
impl OriginStore for S3Origin {
    async fn fetch(&self, key: &str) -> Result<OriginObject, OriginError> {
        let object_key = self.object_key(key);

        let output = self
            .client()
            .await
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
            .map_err(|e| {
                let no_such_key = e
                    .as_service_error()
                    .is_some_and(|service_error| service_error.is_no_such_key());
                let status = e.raw_response().map(|response| response.status().as_u16());

                if status.is_none() && !no_such_key {
                    tracing::error!(bucket = %self.bucket, key = %object_key, error = %e, "S3 get_object failed");
                }
                get_object_failure(key, status, no_such_key, e.to_string())
            })?;

        let content_type = output
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_ORIGIN_CONTENT_TYPE.to_string());

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| OriginError::upstream(format!("Failed to read S3 body: {}", e)))?
            .into_bytes();

        tracing::debug!(bucket = %self.bucket, key = %object_key, bytes = data.len(), "Fetched object from S3");

        Ok(OriginObject { data, content_type })
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}

/// Map a failed `GetObject` to an origin error
///
/// Any answer from S3 (NoSuchKey, AccessDenied, 5xx, ...) means the object
/// is unavailable. Only failures without a response, such as connection
/// errors, are upstream errors.
fn get_object_failure(
    key: &str,
    status: Option<u16>,
    no_such_key: bool,
    detail: String,
) -> OriginError {
    if no_such_key || status.is_some() {
        if !no_such_key {
            tracing::warn!(key = %key, status = ?status, "S3 rejected get_object");
        }
        return OriginError::NotFound {
            key: key.to_string(),
        };
    }

    OriginError::upstream(format!("S3 get_object failed: {}", detail))
}
