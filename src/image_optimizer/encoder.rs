//! Image encoder abstraction
//!
//! Provides a trait-based encoder system that allows:
//! - Swapping encoder implementations per format
//! - Consistent quality handling across formats
//!
//! PNG is lossless, so the quality value is ignored for it: PNG output is
//! always written with the best compression level and adaptive filtering,
//! which keeps the output deterministic for identical input.

use super::error::ImageError;
use super::format::OutputFormat;

/// Quality settings for image encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderQuality {
    /// Quality value (1-100, where 100 is best quality)
    pub quality: u8,
}

impl Default for EncoderQuality {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

impl EncoderQuality {
    /// Create quality settings from a resolved (possibly out-of-range) value
    ///
    /// Codecs only understand 1-100, so this is the one place the value is
    /// clamped.
    pub fn with_quality(quality: i32) -> Self {
        Self {
            quality: quality.clamp(1, 100) as u8,
        }
    }
}

/// Result of encoding an image
#[derive(Debug)]
pub struct EncodedImage {
    /// The encoded image data
    pub data: Vec<u8>,
    /// The output format
    pub format: OutputFormat,
    /// Content-Type header value
    pub content_type: &'static str,
}

impl EncodedImage {
    /// Create a new encoded image result
    pub fn new(data: Vec<u8>, format: OutputFormat) -> Self {
        let content_type = format.content_type();
        Self {
            data,
            format,
            content_type,
        }
    }
}

/// Trait for image encoders
///
/// Implementations are stateless so one instance can serve concurrent
/// requests without leaking state between them.
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> OutputFormat;

    /// Encode raw RGBA image data to the target format
    ///
    /// # Arguments
    /// * `data` - Raw pixel data in RGBA format (4 bytes per pixel)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `quality` - Quality settings
    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: EncoderQuality,
    ) -> Result<EncodedImage, ImageError>;

    /// Check if this encoder supports transparency
    fn supports_transparency(&self) -> bool;
}

/// JPEG encoder using the image crate
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: EncoderQuality,
    ) -> Result<EncodedImage, ImageError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        // JPEG has no alpha channel
        let rgb_data = rgba_to_rgb(data);

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, quality.quality);

        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8)
            .map_err(|e| ImageError::encode_failed("jpeg", e.to_string()))?;

        Ok(EncodedImage::new(output.into_inner(), OutputFormat::Jpeg))
    }

    fn supports_transparency(&self) -> bool {
        false
    }
}

/// PNG encoder using the image crate
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        _quality: EncoderQuality,
    ) -> Result<EncodedImage, ImageError> {
        use image::codecs::png::{CompressionType, FilterType, PngEncoder as ImagePngEncoder};
        use image::ImageEncoder as _;
        use std::io::Cursor;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImagePngEncoder::new_with_quality(
            &mut output,
            CompressionType::Best,
            FilterType::Adaptive,
        );

        encoder
            .write_image(data, width, height, image::ColorType::Rgba8)
            .map_err(|e| ImageError::encode_failed("png", e.to_string()))?;

        Ok(EncodedImage::new(output.into_inner(), OutputFormat::Png))
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// Lossy WebP encoder backed by libwebp
///
/// The `image` crate only writes lossless WebP, which ignores quality, so
/// the `webp` crate is used here.
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::WebP
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: EncoderQuality,
    ) -> Result<EncodedImage, ImageError> {
        let encoder = webp::Encoder::from_rgba(data, width, height);
        let memory = encoder
            .encode_simple(false, quality.quality as f32)
            .map_err(|e| ImageError::encode_failed("webp", format!("{:?}", e)))?;

        Ok(EncodedImage::new(memory.to_vec(), OutputFormat::WebP))
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    /// Create an encoder for the specified output format
    pub fn create(format: OutputFormat) -> Box<dyn ImageEncoder> {
        match format {
            OutputFormat::Jpeg => Box::new(JpegEncoder),
            OutputFormat::Png => Box::new(PngEncoder),
            OutputFormat::WebP => Box::new(WebPEncoder),
        }
    }
}

/// Convert RGBA to RGB by discarding alpha channel
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let pixel_count = rgba.len() / 4;
    let mut rgb = Vec::with_capacity(pixel_count * 3);

    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard_rgba() -> Vec<u8> {
        vec![
            255, 0, 0, 255, // Red
            0, 255, 0, 255, // Green
            0, 0, 255, 255, // Blue
            255, 255, 255, 128, // Semi-transparent white
        ]
    }

    #[test]
    fn test_encoder_quality_default() {
        assert_eq!(EncoderQuality::default().quality, 80);
    }

    #[test]
    fn test_encoder_quality_clamps_values() {
        assert_eq!(EncoderQuality::with_quality(90).quality, 90);
        assert_eq!(EncoderQuality::with_quality(150).quality, 100);
        assert_eq!(EncoderQuality::with_quality(0).quality, 1);
        assert_eq!(EncoderQuality::with_quality(-40).quality, 1);
    }

    #[test]
    fn test_encoder_factory_formats() {
        let encoder = EncoderFactory::create(OutputFormat::Jpeg);
        assert_eq!(encoder.format(), OutputFormat::Jpeg);
        assert!(!encoder.supports_transparency());

        let encoder = EncoderFactory::create(OutputFormat::Png);
        assert_eq!(encoder.format(), OutputFormat::Png);
        assert!(encoder.supports_transparency());

        let encoder = EncoderFactory::create(OutputFormat::WebP);
        assert_eq!(encoder.format(), OutputFormat::WebP);
        assert!(encoder.supports_transparency());
    }

    #[test]
    fn test_rgba_to_rgb() {
        let rgba = vec![255, 128, 64, 255, 0, 0, 0, 128];
        assert_eq!(rgba_to_rgb(&rgba), vec![255, 128, 64, 0, 0, 0]);
    }

    #[test]
    fn test_jpeg_encoder_produces_output() {
        let encoded = JpegEncoder
            .encode(&checkerboard_rgba(), 2, 2, EncoderQuality::default())
            .unwrap();
        assert_eq!(encoded.format, OutputFormat::Jpeg);
        assert_eq!(encoded.content_type, "image/jpeg");
        // JPEG magic bytes: FF D8
        assert_eq!(&encoded.data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_png_encoder_produces_output() {
        let encoded = PngEncoder
            .encode(&checkerboard_rgba(), 2, 2, EncoderQuality::default())
            .unwrap();
        assert_eq!(encoded.content_type, "image/png");
        // PNG magic bytes: 89 50 4E 47
        assert_eq!(&encoded.data[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_png_encoding_ignores_quality() {
        let low = PngEncoder
            .encode(&checkerboard_rgba(), 2, 2, EncoderQuality::with_quality(5))
            .unwrap();
        let high = PngEncoder
            .encode(&checkerboard_rgba(), 2, 2, EncoderQuality::with_quality(95))
            .unwrap();
        assert_eq!(low.data, high.data);
    }

    #[test]
    fn test_webp_encoder_produces_output() {
        let encoded = WebPEncoder
            .encode(&checkerboard_rgba(), 2, 2, EncoderQuality::default())
            .unwrap();
        assert_eq!(encoded.content_type, "image/webp");
        // WebP magic: RIFF....WEBP
        assert_eq!(&encoded.data[0..4], b"RIFF");
        assert_eq!(&encoded.data[8..12], b"WEBP");
    }
}
