// Logging module for structured logging using the tracing crate

use std::error::Error;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};

/// Build the event filter: `RUST_LOG` when set, otherwise the configured level
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, Box<dyn Error>> {
    let directives = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => config.level.clone(),
    };

    Ok(EnvFilter::try_new(directives)?)
}

/// Initialize the tracing subscriber for structured logging
///
/// The subscriber is configured with:
/// - JSON (default) or pretty formatting
/// - Filtering from `RUST_LOG` or the configured level
/// - Output to stdout for container/cloud-native deployments
///
/// Calling this again after a subscriber is installed is a no-op.
///
/// # Errors
///
/// Returns an error if the filter directives cannot be parsed.
///
/// # Examples
///
/// ```
/// use shirasagi::config::LoggingConfig;
/// use shirasagi::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default()).expect("Failed to initialize logging");
///
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    let filter = build_filter(config)?;

    let installed = match config.format {
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init(),
        LogFormat::Pretty => Registry::default()
            .with(filter)
            .with(fmt::layer().pretty())
            .try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }

    Ok(())
}
