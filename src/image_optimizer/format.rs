//! Output format selection
//!
//! Maps a requested [`TargetFormat`] plus the origin's declared content type
//! to a concrete encoder format. `None` means "do not encode": the source
//! bytes are returned as stored.

use super::params::TargetFormat;

/// Concrete format produced by an encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Detect a re-encodable format from a Content-Type header value
    ///
    /// Media type parameters (`; charset=...`) are ignored and the match is
    /// case-insensitive. Anything other than JPEG, PNG or WebP yields `None`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match media_type.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }
}

/// Select the encoder format for a request
///
/// Explicit formats always encode. `Original` and unrecognized formats keep
/// the source format when it is one we can re-encode; otherwise the source
/// is returned untouched.
pub fn select_output_format(
    target: TargetFormat,
    source_content_type: &str,
) -> Option<OutputFormat> {
    match target {
        TargetFormat::WebP => Some(OutputFormat::WebP),
        TargetFormat::Jpeg => Some(OutputFormat::Jpeg),
        TargetFormat::Png => Some(OutputFormat::Png),
        TargetFormat::Original | TargetFormat::Reencode => {
            OutputFormat::from_content_type(source_content_type)
        }
    }
}
