//! Origin store configuration types.
//!
//! The backend is selected by the `type` tag:
//!
//! ```yaml
//! origin:
//!   type: s3
//!   bucket: images
//!   region: us-east-1
//!   access_key: ${AWS_ACCESS_KEY_ID}
//!   secret_key: ${AWS_SECRET_ACCESS_KEY}
//!   fetch_timeout_ms: 5000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::DEFAULT_FETCH_TIMEOUT_MS;

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

/// Origin backend selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OriginBackend {
    /// S3 or S3-compatible object storage
    S3 {
        bucket: String,
        region: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        access_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secret_key: Option<String>,
        /// Custom endpoint (MinIO, R2, ...)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
        /// Prepended to every storage key
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_prefix: Option<String>,
    },
    /// Plain HTTP(S) server; objects live at `{base_url}/{key}`
    Http { base_url: String },
    /// In-process store, optionally seeded from a local directory
    Memory {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed_dir: Option<PathBuf>,
    },
}

impl Default for OriginBackend {
    fn default() -> Self {
        Self::Memory { seed_dir: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OriginConfig {
    #[serde(flatten)]
    pub backend: OriginBackend,
    /// Upper bound for a single origin fetch in milliseconds (default: 10000)
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            backend: OriginBackend::default(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl OriginConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_ms == 0 {
            return Err("origin.fetch_timeout_ms must be greater than 0".to_string());
        }

        match &self.backend {
            OriginBackend::S3 {
                bucket,
                region,
                access_key,
                secret_key,
                ..
            } => {
                if bucket.is_empty() {
                    return Err("S3 bucket name cannot be empty".to_string());
                }
                if region.is_empty() {
                    return Err("S3 region cannot be empty".to_string());
                }
                if access_key.is_some() != secret_key.is_some() {
                    return Err(
                        "S3 access_key and secret_key must be provided together".to_string()
                    );
                }
            }
            OriginBackend::Http { base_url } => {
                if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                    return Err(format!(
                        "HTTP origin base_url must start with http:// or https://, got '{}'",
                        base_url
                    ));
                }
            }
            OriginBackend::Memory { .. } => {}
        }

        Ok(())
    }
}
