//! Image optimization error types
//!
//! Every variant except [`ImageError::EmptySource`] is a processing failure
//! from the caller's point of view: the request terminates with a 500 and no
//! partial image is returned.

use thiserror::Error;

/// Errors that can occur while transforming an image
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    // === Input Errors ===
    /// Source buffer is zero-length; nothing to decode
    #[error("Source image is empty")]
    EmptySource,

    /// Input file size exceeds limit
    #[error("File size {size} bytes exceeds maximum {max_size} bytes")]
    FileTooLarge { size: usize, max_size: usize },

    /// Image dimensions exceed safety limits (image bomb protection)
    #[error("Image dimensions {width}x{height} ({pixels} pixels) exceed limit of {max_pixels} pixels")]
    ImageBombDetected {
        width: u32,
        height: u32,
        pixels: u64,
        max_pixels: u64,
    },

    // === Decoding Errors ===
    /// Failed to decode image data
    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: String },

    // === Processing Errors ===
    /// Resize operation failed
    #[error("Resize failed: {message}")]
    ResizeFailed { message: String },

    /// Encoding to output format failed
    #[error("Failed to encode to {format}: {message}")]
    EncodeFailed { format: String, message: String },

    /// Blocking codec task was cancelled or panicked
    #[error("Image processing task failed: {message}")]
    TaskFailed { message: String },
}

impl ImageError {
    /// Maps image errors to HTTP status codes
    ///
    /// Status mapping:
    /// - EmptySource → 404 (origin effectively has no image)
    /// - everything else → 500 (processing failure)
    pub fn to_http_status(&self) -> u16 {
        match self {
            ImageError::EmptySource => 404,
            ImageError::FileTooLarge { .. }
            | ImageError::ImageBombDetected { .. }
            | ImageError::DecodeFailed { .. }
            | ImageError::ResizeFailed { .. }
            | ImageError::EncodeFailed { .. }
            | ImageError::TaskFailed { .. } => 500,
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        ImageError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn image_bomb(width: u32, height: u32, max_pixels: u64) -> Self {
        ImageError::ImageBombDetected {
            width,
            height,
            pixels: width as u64 * height as u64,
            max_pixels,
        }
    }
}
