use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CACHE_CONTROL, DEFAULT_MAX_INPUT_BYTES, DEFAULT_MAX_PIXELS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageConfig {
    /// Maximum source size accepted for transformation (passthrough is unaffected)
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,

    /// Maximum decoded pixel count (image bomb protection)
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,

    /// Cache-Control value attached to every successful image response
    #[serde(default = "default_cache_control")]
    pub cache_control: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_pixels: DEFAULT_MAX_PIXELS,
            cache_control: DEFAULT_CACHE_CONTROL.to_string(),
        }
    }
}

fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}

fn default_max_pixels() -> u64 {
    DEFAULT_MAX_PIXELS
}

fn default_cache_control() -> String {
    DEFAULT_CACHE_CONTROL.to_string()
}
