// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Server defaults
// =============================================================================

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 4;

/// Default URL prefix under which stored images are served
pub const DEFAULT_ROUTE_PREFIX: &str = "/assets";

// =============================================================================
// Origin defaults
// =============================================================================

/// Default origin fetch timeout in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Content type assumed when an origin does not declare one
pub const DEFAULT_ORIGIN_CONTENT_TYPE: &str = "application/octet-stream";

// =============================================================================
// Image defaults
// =============================================================================

/// Default encode quality when the request does not carry one
pub const DEFAULT_QUALITY: i32 = 80;

/// Default maximum source size accepted for transformation (50 MB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;

/// Default decoded pixel budget (image bomb guard, ~100 megapixels)
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;

/// Default Cache-Control value emitted with every image response
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

// =============================================================================
// Auto-optimization tuning
// =============================================================================

/// Quality chosen for mobile devices
pub const MOBILE_QUALITY: i32 = 50;

/// Width bound filled in for mobile devices when none is requested
pub const MOBILE_DEFAULT_WIDTH: u32 = 800;

/// Quality chosen for tablets
pub const TABLET_QUALITY: i32 = 75;

/// Width bound filled in for tablets when none is requested
pub const TABLET_DEFAULT_WIDTH: u32 = 1200;

/// Quality chosen for desktops
pub const DESKTOP_QUALITY: i32 = 90;

/// Quality ceiling on slow connections
pub const SLOW_QUALITY_CEILING: i32 = 50;

/// Dimension ceiling on slow connections
pub const SLOW_DIMENSION_CEILING: u32 = 600;

/// Quality ceiling on moderate connections
pub const MODERATE_QUALITY_CEILING: i32 = 70;

/// Dimension ceiling on moderate connections
pub const MODERATE_DIMENSION_CEILING: u32 = 1000;
