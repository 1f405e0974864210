//! Image processing implementation
//!
//! Handles the actual image transformation: decode → resize → encode.
//! The codec is abstracted behind [`ImageCodec`] so the executor does not
//! depend on a particular image library.

use bytes::Bytes;
use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::io::Cursor;
use std::num::NonZeroU32;

use super::config::ImageConfig;
use super::encoder::{EncodedImage, EncoderFactory, EncoderQuality};
use super::error::ImageError;
use super::format::{select_output_format, OutputFormat};
use super::params::EffectiveTransform;
use super::security::{validate_dimensions, validate_file_size};

/// Result of image processing
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// The response body
    pub data: Bytes,
    /// Content-Type header value
    pub content_type: String,
    /// Source dimensions (width, height); `None` when the source was not decoded
    pub original_size: Option<(u32, u32)>,
    /// Output dimensions (width, height); `None` when the source was not decoded
    pub output_size: Option<(u32, u32)>,
    /// True when `data` is the untouched source
    pub passthrough: bool,
}

impl ProcessedImage {
    fn passthrough(source: Bytes, content_type: &str) -> Self {
        Self {
            data: source,
            content_type: content_type.to_string(),
            original_size: None,
            output_size: None,
            passthrough: true,
        }
    }
}

/// Narrow codec interface used by the executor
///
/// Implementations must be stateless per call: one instance is shared by
/// every concurrent request.
pub trait ImageCodec: Send + Sync {
    /// Decode encoded bytes into an in-memory image
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, ImageError>;

    /// Resize to exactly `width` x `height`
    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, ImageError>;

    /// Encode to the given format
    fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        quality: EncoderQuality,
    ) -> Result<EncodedImage, ImageError>;
}

/// Default codec: `image` for decoding, `fast_image_resize` for resizing,
/// [`EncoderFactory`] for encoding
#[derive(Debug, Clone, Default)]
pub struct RasterCodec {
    config: ImageConfig,
}

impl RasterCodec {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }
}

impl ImageCodec for RasterCodec {
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, ImageError> {
        // Read the header first so oversized images are rejected before
        // their pixel buffer is allocated
        let (width, height) = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ImageError::decode_failed(e.to_string()))?
            .into_dimensions()
            .map_err(|e| ImageError::decode_failed(e.to_string()))?;
        validate_dimensions(width, height, &self.config)?;

        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ImageError::decode_failed(e.to_string()))?
            .decode()
            .map_err(|e| ImageError::decode_failed(e.to_string()))
    }

    /// Resize image using fast-image-resize with Lanczos3 filter
    fn resize(
        &self,
        image: &DynamicImage,
        target_w: u32,
        target_h: u32,
    ) -> Result<DynamicImage, ImageError> {
        let src_width = NonZeroU32::new(image.width())
            .ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
        let src_height = NonZeroU32::new(image.height())
            .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;
        let dst_width = NonZeroU32::new(target_w)
            .ok_or_else(|| ImageError::resize_failed("Target width is 0"))?;
        let dst_height = NonZeroU32::new(target_h)
            .ok_or_else(|| ImageError::resize_failed("Target height is 0"))?;

        let src_image = Image::from_vec_u8(
            src_width,
            src_height,
            image.to_rgba8().into_raw(),
            PixelType::U8x4,
        )
        .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

        let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

        let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

        resizer
            .resize(&src_image.view(), &mut dst_image.view_mut())
            .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

        let rgba_image = image::RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
            .ok_or_else(|| ImageError::resize_failed("Failed to create output image buffer"))?;

        Ok(DynamicImage::ImageRgba8(rgba_image))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        quality: EncoderQuality,
    ) -> Result<EncodedImage, ImageError> {
        let rgba = image.to_rgba8();
        EncoderFactory::create(format).encode(rgba.as_raw(), rgba.width(), rgba.height(), quality)
    }
}

/// Applies an [`EffectiveTransform`] to source bytes
#[derive(Debug, Clone)]
pub struct TransformExecutor<C = RasterCodec> {
    codec: C,
    config: ImageConfig,
}

impl TransformExecutor<RasterCodec> {
    /// Executor backed by the default codec
    pub fn from_config(config: ImageConfig) -> Self {
        Self::new(RasterCodec::new(config.clone()), config)
    }
}

impl<C: ImageCodec> TransformExecutor<C> {
    pub fn new(codec: C, config: ImageConfig) -> Self {
        Self { codec, config }
    }

    /// Transform `source` according to `transform`
    ///
    /// The codec is never invoked when the tuple is a passthrough or when
    /// the source format cannot be re-encoded; the stored bytes and content
    /// type are returned as-is.
    pub fn execute(
        &self,
        source: Bytes,
        source_content_type: &str,
        transform: &EffectiveTransform,
    ) -> Result<ProcessedImage, ImageError> {
        if source.is_empty() {
            return Err(ImageError::EmptySource);
        }

        if transform.is_passthrough() {
            return Ok(ProcessedImage::passthrough(source, source_content_type));
        }

        let output_format = match select_output_format(transform.format, source_content_type) {
            Some(format) => format,
            None => {
                tracing::debug!(
                    content_type = %source_content_type,
                    "Source format cannot be re-encoded, returning original bytes"
                );
                return Ok(ProcessedImage::passthrough(source, source_content_type));
            }
        };

        validate_file_size(source.len(), &self.config)?;

        // 1. Decode the image
        let img = self.codec.decode(&source)?;
        let src_width = img.width();
        let src_height = img.height();

        // 2. Fit inside the requested bounds, never enlarging
        let (target_width, target_height) =
            fit_inside(src_width, src_height, transform.width, transform.height);

        // 3. Resize if dimensions changed
        let processed_img = if target_width != src_width || target_height != src_height {
            self.codec.resize(&img, target_width, target_height)?
        } else {
            img
        };

        // 4. Encode to target format
        let quality = EncoderQuality::with_quality(transform.quality);
        let encoded = self.codec.encode(&processed_img, output_format, quality)?;

        tracing::debug!(
            format = output_format.as_str(),
            quality = quality.quality,
            src_width,
            src_height,
            target_width,
            target_height,
            input_bytes = source.len(),
            output_bytes = encoded.data.len(),
            "Image transformed"
        );

        Ok(ProcessedImage {
            data: Bytes::from(encoded.data),
            content_type: encoded.content_type.to_string(),
            original_size: Some((src_width, src_height)),
            output_size: Some((target_width, target_height)),
            passthrough: false,
        })
    }
}

/// Scale `src_w` x `src_h` to fit inside the optional bounds
///
/// Aspect ratio is preserved, the result never exceeds the source on either
/// axis, and neither side drops below one pixel. The binding axis receives
/// its bound exactly; the other axis is rounded half up.
pub fn fit_inside(
    src_w: u32,
    src_h: u32,
    max_w: Option<u32>,
    max_h: Option<u32>,
) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (src_w, src_h);
    }

    let bound_w = max_w.unwrap_or(src_w).clamp(1, src_w);
    let bound_h = max_h.unwrap_or(src_h).clamp(1, src_h);

    if bound_w == src_w && bound_h == src_h {
        return (src_w, src_h);
    }

    // Width binds when bound_w / src_w <= bound_h / src_h
    if bound_w as u64 * src_h as u64 <= bound_h as u64 * src_w as u64 {
        (bound_w, scale_rounded(src_h, bound_w, src_w))
    } else {
        (scale_rounded(src_w, bound_h, src_h), bound_h)
    }
}

/// round(value * numerator / denominator), at least 1
fn scale_rounded(value: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (2 * value as u64 * numerator as u64 + denominator as u64) / (2 * denominator as u64);
    scaled.max(1) as u32
}
