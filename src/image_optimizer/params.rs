//! Image transformation parameter parsing
//!
//! Query parameters recognized on the asset endpoint:
//! `?quality=60&format=webp&width=500&height=300&original=true&autoOptimize=true`
//!
//! Parsing is deliberately permissive: values that fail to parse are treated
//! as absent and fall back to defaults instead of rejecting the request.

use std::collections::HashMap;

use crate::constants::DEFAULT_QUALITY;

/// Requested output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetFormat {
    /// Keep the source format; passthrough when no resize is requested
    #[default]
    Original,
    WebP,
    Jpeg,
    Png,
    /// Unrecognized `format` value: keep the source format but re-encode
    /// with the requested quality
    Reencode,
}

impl TargetFormat {
    /// Parse a `format` query value. Never fails: unknown values map to
    /// [`TargetFormat::Reencode`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "original" => Self::Original,
            "webp" => Self::WebP,
            "jpeg" | "jpg" => Self::Jpeg,
            "png" => Self::Png,
            _ => Self::Reencode,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::WebP => "webp",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Reencode => "reencode",
        }
    }

    /// Whether the output keeps the source's format
    pub fn keeps_source_format(&self) -> bool {
        matches!(self, Self::Original | Self::Reencode)
    }
}

/// Transformation intent parsed from a single HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    /// Opaque origin identifier, e.g. `"{userId}/{imageId}"`
    pub storage_key: String,
    /// Bypass all transformation (`original=true`)
    pub return_original: bool,
    /// Requested output format
    pub format: TargetFormat,
    /// Requested quality, kept exactly as parsed (no clamping)
    pub quality: i32,
    /// Requested width bound
    pub width: Option<u32>,
    /// Requested height bound
    pub height: Option<u32>,
    /// Enable device/connection heuristics (`autoOptimize=true`)
    pub auto_optimize: bool,
}

impl TransformRequest {
    /// Create a request with default parameters for the given key
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
            return_original: false,
            format: TargetFormat::Original,
            quality: DEFAULT_QUALITY,
            width: None,
            height: None,
            auto_optimize: false,
        }
    }

    /// Parse from query parameters (e.g., ?width=800&quality=60&format=webp)
    pub fn from_query(storage_key: impl Into<String>, params: &HashMap<String, String>) -> Self {
        let mut result = Self::new(storage_key);

        if let Some(q) = params.get("quality") {
            result.quality = parse_quality(q).unwrap_or(DEFAULT_QUALITY);
        }

        if let Some(fmt) = params.get("format") {
            result.format = TargetFormat::parse(fmt);
        }

        result.width = params.get("width").and_then(|w| parse_dimension(w));
        result.height = params.get("height").and_then(|h| parse_dimension(h));
        result.return_original = params.get("original").is_some_and(|v| parse_flag(v));
        result.auto_optimize = params.get("autoOptimize").is_some_and(|v| parse_flag(v));

        result
    }

    /// The transform implied by the explicit parameters alone
    pub fn requested_transform(&self) -> EffectiveTransform {
        EffectiveTransform {
            format: self.format,
            quality: self.quality,
            width: self.width,
            height: self.height,
        }
    }
}

/// The `{format, quality, width, height}` tuple actually applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectiveTransform {
    pub format: TargetFormat,
    pub quality: i32,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl EffectiveTransform {
    /// A tuple that returns the source untouched
    pub fn passthrough(quality: i32) -> Self {
        Self {
            format: TargetFormat::Original,
            quality,
            width: None,
            height: None,
        }
    }

    /// Original format with no resize bounds
    pub fn is_passthrough(&self) -> bool {
        self.format == TargetFormat::Original && !self.has_bounds()
    }

    /// Check if a width or height bound is requested
    pub fn has_bounds(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

/// Quality is any integer; anything else is absent
fn parse_quality(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok()
}

/// Positive pixel count, or absent
fn parse_dimension(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|px| *px > 0)
}

fn parse_flag(value: &str) -> bool {
    value.trim() == "true"
}
