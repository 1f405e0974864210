// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub mod logging;
pub mod origin;
pub mod server;

pub use crate::image_optimizer::ImageConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use origin::{OriginBackend, OriginConfig};
pub use server::ServerConfig;

static ENV_VAR_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Matches `${VAR_NAME}` references
fn env_var_pattern() -> &'static Regex {
    ENV_VAR_PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .expect("Invalid env var regex - this is a compile-time bug")
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub origin: OriginConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = env_var_pattern();

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.origin.validate()?;
        self.logging.validate()?;

        if self.image.max_input_bytes == 0 {
            return Err("image.max_input_bytes must be greater than 0".to_string());
        }
        if self.image.max_pixels == 0 {
            return Err("image.max_pixels must be greater than 0".to_string());
        }
        if self.image.cache_control.trim().is_empty() {
            return Err("image.cache_control cannot be empty".to_string());
        }

        Ok(())
    }
}
