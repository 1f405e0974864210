//! Server configuration types.
//!
//! This module defines the server-level configuration including:
//! - Address and port bindings
//! - Worker thread count
//! - The route prefix assets are served under
//!
//! Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ROUTE_PREFIX, DEFAULT_THREADS};

// Default worker thread count
fn default_threads() -> usize {
    DEFAULT_THREADS
}

fn default_route_prefix() -> String {
    DEFAULT_ROUTE_PREFIX.to_string()
}

/// Paths answered by the server itself
pub const RESERVED_PATHS: [&str; 2] = ["/health", "/metrics"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Number of worker threads (default: 4)
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// URL prefix for asset requests (default: /assets)
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,
}

impl ServerConfig {
    /// `address:port` for the TCP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.address.trim().is_empty() {
            return Err("server.address cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("server.port must be greater than 0".to_string());
        }
        if self.threads == 0 {
            return Err("server.threads must be greater than 0".to_string());
        }

        let prefix = self.route_prefix.trim_end_matches('/');
        if !self.route_prefix.starts_with('/') {
            return Err(format!(
                "server.route_prefix '{}' does not start with /",
                self.route_prefix
            ));
        }
        if prefix.is_empty() {
            return Err("server.route_prefix cannot be the root path".to_string());
        }
        if RESERVED_PATHS.contains(&prefix) {
            return Err(format!(
                "server.route_prefix '{}' collides with a built-in endpoint",
                self.route_prefix
            ));
        }

        Ok(())
    }
}
