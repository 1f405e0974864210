// Configuration loading tests: YAML files, env substitution and validation

use shirasagi::config::{Config, LogFormat, OriginBackend};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(yaml.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_s3_origin_config() {
    let file = write_config(
        r#"
server:
  address: "0.0.0.0"
  port: 8080
origin:
  type: s3
  bucket: "originals"
  region: "ap-northeast-1"
  endpoint: "http://localhost:9000"
  access_key: "minio"
  secret_key: "minio123"
  key_prefix: "images/"
  fetch_timeout_ms: 2500
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.origin.fetch_timeout_ms, 2500);

    match config.origin.backend {
        OriginBackend::S3 {
            bucket,
            region,
            endpoint,
            key_prefix,
            ..
        } => {
            assert_eq!(bucket, "originals");
            assert_eq!(region, "ap-northeast-1");
            assert_eq!(endpoint.as_deref(), Some("http://localhost:9000"));
            assert_eq!(key_prefix.as_deref(), Some("images/"));
        }
        other => panic!("expected S3 origin, got {:?}", other),
    }
}

#[test]
fn test_memory_origin_with_seed_dir() {
    let file = write_config(
        r#"
server:
  address: "127.0.0.1"
  port: 8080
origin:
  type: memory
  seed_dir: "./originals"
logging:
  format: pretty
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(
        config.origin.backend,
        OriginBackend::Memory {
            seed_dir: Some(PathBuf::from("./originals"))
        }
    );
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_unknown_origin_type_is_rejected() {
    let yaml = r#"
server:
  address: "127.0.0.1"
  port: 8080
origin:
  type: ftp
"#;
    assert!(Config::from_yaml_with_env(yaml).is_err());
}

#[test]
fn test_missing_server_section_is_rejected() {
    assert!(Config::from_yaml_with_env("logging:\n  level: info\n").is_err());
}

#[test]
fn test_env_substitution_in_credentials() {
    std::env::set_var("SHIRASAGI_UNIT_SECRET", "s3cr3t");
    let yaml = r#"
server:
  address: "127.0.0.1"
  port: 8080
origin:
  type: s3
  bucket: "originals"
  region: "us-east-1"
  access_key: "AKIA"
  secret_key: "${SHIRASAGI_UNIT_SECRET}"
"#;

    let config = Config::from_yaml_with_env(yaml).unwrap();
    match config.origin.backend {
        OriginBackend::S3 { secret_key, .. } => {
            assert_eq!(secret_key.as_deref(), Some("s3cr3t"))
        }
        other => panic!("expected S3 origin, got {:?}", other),
    }
}
