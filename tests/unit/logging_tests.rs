// Logging tests: subscriber installation and filter construction

use shirasagi::config::{LogFormat, LoggingConfig};
use shirasagi::logging::{build_filter, init_subscriber};

/// Test: Can initialize tracing subscriber
///
/// Initialization succeeds and a second call keeps the installed
/// subscriber instead of failing.
#[test]
fn test_can_initialize_tracing_subscriber() {
    let config = LoggingConfig::default();

    assert!(init_subscriber(&config).is_ok());
    assert!(init_subscriber(&config).is_ok());

    tracing::info!(request_id = "test-123", "structured event after init");
}

#[test]
fn test_pretty_format_initializes() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Pretty,
    };

    assert!(init_subscriber(&config).is_ok());
}

#[test]
fn test_build_filter_accepts_target_directives() {
    if std::env::var("RUST_LOG").is_ok() {
        return;
    }

    let config = LoggingConfig {
        level: "shirasagi=debug,pingora_core=warn".to_string(),
        format: LogFormat::Json,
    };

    assert!(build_filter(&config).is_ok());
}

#[test]
fn test_build_filter_rejects_invalid_level() {
    if std::env::var("RUST_LOG").is_ok() {
        return;
    }

    let config = LoggingConfig {
        level: "shirasagi=loud".to_string(),
        format: LogFormat::Json,
    };

    assert!(build_filter(&config).is_err());
}
