//! Client-facing asset errors
//!
//! Messages are generic: details stay in the logs, never in the body.

use thiserror::Error;

use crate::image_optimizer::ImageError;
use crate::metrics::RequestOutcome;
use crate::origin::OriginError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssetError {
    /// Unknown key, missing object, or zero-length body
    #[error("Image not found")]
    NotFound,

    /// Decode, resize or encode failed, or the source exceeded a limit
    #[error("Failed to process image")]
    ProcessingFailure,

    /// The origin did not answer within the fetch timeout
    #[error("Origin timed out")]
    UpstreamTimeout,

    /// The origin could not be reached or its body could not be read
    #[error("Origin request failed")]
    Upstream,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AssetError {
    pub fn to_http_status(&self) -> u16 {
        match self {
            AssetError::NotFound => 404,
            AssetError::ProcessingFailure => 500,
            AssetError::UpstreamTimeout => 504,
            AssetError::Upstream => 500,
            AssetError::MethodNotAllowed => 405,
        }
    }

    pub fn outcome(&self) -> RequestOutcome {
        match self {
            AssetError::NotFound => RequestOutcome::NotFound,
            AssetError::ProcessingFailure => RequestOutcome::ProcessingFailure,
            AssetError::UpstreamTimeout => RequestOutcome::UpstreamTimeout,
            AssetError::Upstream => RequestOutcome::UpstreamError,
            AssetError::MethodNotAllowed => RequestOutcome::MethodNotAllowed,
        }
    }

    /// `{"error": "..."}`
    pub fn to_json(&self) -> String {
        serde_json::json!({ "error": self.to_string() }).to_string()
    }
}

impl From<OriginError> for AssetError {
    fn from(err: OriginError) -> Self {
        match err {
            OriginError::NotFound { .. } => AssetError::NotFound,
            OriginError::Timeout { .. } => AssetError::UpstreamTimeout,
            OriginError::Upstream { .. } => AssetError::Upstream,
        }
    }
}

impl From<ImageError> for AssetError {
    fn from(err: ImageError) -> Self {
        match err.to_http_status() {
            404 => AssetError::NotFound,
            _ => AssetError::ProcessingFailure,
        }
    }
}
