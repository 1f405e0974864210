//! Source validation limits
//!
//! Guards applied before any pixel work: the encoded size of the source and
//! the decoded dimensions it declares.

use super::config::ImageConfig;
use super::error::ImageError;

/// Validate the encoded size of a source image
pub fn validate_file_size(size: usize, config: &ImageConfig) -> Result<(), ImageError> {
    if size > config.max_input_bytes {
        return Err(ImageError::FileTooLarge {
            size,
            max_size: config.max_input_bytes,
        });
    }
    Ok(())
}

/// Validate decoded dimensions against the pixel budget
pub fn validate_dimensions(width: u32, height: u32, config: &ImageConfig) -> Result<(), ImageError> {
    let pixels = width as u64 * height as u64;
    if pixels > config.max_pixels {
        return Err(ImageError::image_bomb(width, height, config.max_pixels));
    }
    Ok(())
}
