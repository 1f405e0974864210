// Error types module

use thiserror::Error;

/// Errors that stop the server from starting
///
/// Request-time failures never surface here; they are answered as JSON
/// responses by the asset service.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Unreadable or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The logging subscriber could not be built
    #[error("Logging error: {0}")]
    Logging(String),

    /// The origin store could not be constructed
    #[error("Origin error: {0}")]
    Origin(String),

    /// The Pingora server could not be created
    #[error("Server error: {0}")]
    Server(String),
}
