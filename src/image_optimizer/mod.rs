//! Image optimization module
//!
//! Turns source bytes plus an [`EffectiveTransform`] into response bytes:
//! - Transform parameters parsed from query strings
//! - Fit-inside resizing that never enlarges
//! - Re-encoding to JPEG, PNG or lossy WebP
//! - Byte-identical passthrough when nothing needs to change
//!
//! # Query Parameters
//!
//! ```text
//! /assets/u1/img1?format=webp&quality=60&width=500
//! ```
//!
//! # Safety limits
//!
//! Sources larger than `max_input_bytes`, or declaring more than
//! `max_pixels` pixels, are rejected before any pixel buffer is allocated.

// Core modules
pub mod config;
pub mod encoder;
pub mod error;
pub mod format;
pub mod params;
pub mod processor;
pub mod security;

// Re-export commonly used types
pub use config::ImageConfig;
pub use encoder::{EncodedImage, EncoderFactory, EncoderQuality, ImageEncoder};
pub use error::ImageError;
pub use format::{select_output_format, OutputFormat};
pub use params::{EffectiveTransform, TargetFormat, TransformRequest};
pub use processor::{fit_inside, ImageCodec, ProcessedImage, RasterCodec, TransformExecutor};
pub use security::{validate_dimensions, validate_file_size};
