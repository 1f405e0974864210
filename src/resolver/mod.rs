//! Request parameter resolution
//!
//! Derives the effective `{format, quality, width, height}` tuple for a
//! request from its query parameters and, when `autoOptimize=true`, from
//! device and network hints in the request headers.
//!
//! Resolution is pure: identical inputs always produce identical output.

pub mod connection;
pub mod device;

pub use connection::{ClientSignals, ConnectionClass};
pub use device::DeviceClass;

use std::collections::HashMap;

use crate::constants::{
    DESKTOP_QUALITY, MOBILE_DEFAULT_WIDTH, MOBILE_QUALITY, MODERATE_DIMENSION_CEILING,
    MODERATE_QUALITY_CEILING, SLOW_DIMENSION_CEILING, SLOW_QUALITY_CEILING, TABLET_DEFAULT_WIDTH,
    TABLET_QUALITY,
};
use crate::image_optimizer::{EffectiveTransform, TargetFormat, TransformRequest};

/// Everything decided about a request before the origin is contacted
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub request: TransformRequest,
    pub device: DeviceClass,
    pub connection: ConnectionClass,
    pub effective: EffectiveTransform,
}

impl Resolution {
    /// Whether the response varies with client hint headers
    pub fn varies_by_client(&self) -> bool {
        self.request.auto_optimize && !self.request.return_original
    }
}

/// Resolve the effective transform for a request
///
/// `original=true` wins over everything else, including `autoOptimize`.
pub fn resolve(
    storage_key: &str,
    query: &HashMap<String, String>,
    headers: &HashMap<String, String>,
) -> Resolution {
    let request = TransformRequest::from_query(storage_key, query);
    let signals = ClientSignals::from_headers(headers);

    let device = DeviceClass::from_user_agent(signals.user_agent.as_deref());
    let connection = ConnectionClass::detect(&signals);

    let effective = if request.return_original {
        EffectiveTransform::passthrough(request.quality)
    } else if request.auto_optimize {
        apply_auto_optimization(request.requested_transform(), device, connection)
    } else {
        request.requested_transform()
    };

    Resolution {
        request,
        device,
        connection,
        effective,
    }
}

/// Override `base` with device defaults, then refine by connection class
///
/// The connection step runs last and may undo device decisions (a slow
/// connection always ends in JPEG). Explicit width/height in `base` are
/// kept as the starting point for clamping.
pub fn apply_auto_optimization(
    base: EffectiveTransform,
    device: DeviceClass,
    connection: ConnectionClass,
) -> EffectiveTransform {
    let mut transform = base;

    match device {
        DeviceClass::Mobile => {
            transform.quality = MOBILE_QUALITY;
            transform.format = TargetFormat::WebP;
            transform.width = Some(base.width.unwrap_or(MOBILE_DEFAULT_WIDTH));
        }
        DeviceClass::Tablet => {
            transform.quality = TABLET_QUALITY;
            transform.format = TargetFormat::WebP;
            transform.width = Some(base.width.unwrap_or(TABLET_DEFAULT_WIDTH));
        }
        DeviceClass::Desktop => {
            transform.quality = DESKTOP_QUALITY;
            transform.format = TargetFormat::WebP;
        }
    }

    match connection {
        ConnectionClass::Slow => {
            transform.quality = transform.quality.min(SLOW_QUALITY_CEILING);
            transform.format = TargetFormat::Jpeg;
            clamp_bounds(&mut transform, SLOW_DIMENSION_CEILING);
        }
        ConnectionClass::Moderate => {
            transform.quality = transform.quality.min(MODERATE_QUALITY_CEILING);
            if transform.format == TargetFormat::Original {
                transform.format = TargetFormat::WebP;
            }
            clamp_bounds(&mut transform, MODERATE_DIMENSION_CEILING);
        }
        ConnectionClass::Fast => {}
    }

    transform
}

/// Clamp bounds that are already set; absent bounds stay absent
fn clamp_bounds(transform: &mut EffectiveTransform, ceiling: u32) {
    transform.width = transform.width.map(|w| w.min(ceiling));
    transform.height = transform.height.map(|h| h.min(ceiling));
}
