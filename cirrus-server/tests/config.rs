use std::collections::HashMap;
use std::fs;

use cirrus_core::SignatureAlgorithm;
use cirrus_server::infra::config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader,
    sources::EnvConfig,
};
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> EnvConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvConfig::from_lookup(|name| vars.get(name).cloned())
}

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("cirrus.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn defaults_apply_without_file_or_env() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(env(&[]))
        .load()
        .unwrap();

    let config = load.config;
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.cloudinary.api_base, "https://api.cloudinary.com");
    assert_eq!(config.cloudinary.max_results, 100);
    assert_eq!(
        config.cloudinary.signature_algorithm,
        SignatureAlgorithm::Sha1
    );
    assert!(config.remote_patterns.is_empty());
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
    assert!(load.warnings.contains("CLOUDINARY_API_SECRET"));
}

#[test]
fn environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
dev_mode = true

[server]
host = "127.0.0.1"
port = 8080

[cloudinary]
cloud_name = "from-file"
api_key = "file-key"
api_secret = "file-secret"
library_tag = "file-tag"
signature_algorithm = "sha256"
"#,
    );

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(env(&[
            ("SERVER_PORT", "9090"),
            ("CLOUDINARY_CLOUD_NAME", "from-env"),
            ("NEXT_PUBLIC_CLOUDINARY_LIBRARY_TAG", "env-tag"),
        ]))
        .load()
        .unwrap()
        .config;

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.cloudinary.cloud_name.as_deref(), Some("from-env"));
    assert_eq!(config.cloudinary.api_key.as_deref(), Some("file-key"));
    assert_eq!(config.cloudinary.library_tag.as_deref(), Some("env-tag"));
    assert_eq!(
        config.cloudinary.signature_algorithm,
        SignatureAlgorithm::Sha256
    );
    assert!(config.dev_mode);

    // Default allow-list follows the effective cloud name.
    assert_eq!(config.remote_patterns.len(), 1);
    assert!(config.remote_patterns[0].matches_str(
        "https://res.cloudinary.com/from-env/image/upload/v1/a.jpg"
    ));
}

#[test]
fn explicit_remote_patterns_replace_default() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[cloudinary]
cloud_name = "demo"

[[images.remote_patterns]]
protocol = "https"
hostname = "*.example.com"
pathname = "/media/**"
"#,
    );

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(env(&[]))
        .load()
        .unwrap()
        .config;

    assert_eq!(config.remote_patterns.len(), 1);
    assert!(
        config.remote_patterns[0]
            .matches_str("https://cdn.example.com/media/a/b.png")
    );
}

#[test]
fn invalid_remote_pattern_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[[images.remote_patterns]]
hostname = "example.com"
pathname = "media/**"
"#,
    );

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(env(&[]))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::InvalidRemotePattern(_)));
}

#[test]
fn max_results_is_clamped_with_warning() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(env(&[("CLOUDINARY_MAX_RESULTS", "5000")]))
        .load()
        .unwrap();

    assert_eq!(load.config.cloudinary.max_results, 500);
    assert!(load.warnings.contains("out of range"));
}

#[test]
fn unknown_algorithm_fails_to_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(env(&[("CLOUDINARY_SIGNATURE_ALGORITHM", "md5")]))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::InvalidSignatureAlgorithm(ref raw) if raw == "md5"));
}

#[test]
fn cors_wildcard_requires_dev_mode() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(env(&[("CORS_ALLOWED_ORIGINS", "*")]))
        .load()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::DangerousCorsWildcard)
    ));

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(env(&[("CORS_ALLOWED_ORIGINS", "*"), ("DEV_MODE", "true")]))
        .load();
    assert!(load.is_ok());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .with_env(env(&[]))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn malformed_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[server\nport = ");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(env(&[]))
        .load()
        .unwrap_err();
    match err {
        ConfigLoadError::Parse { path: reported, .. } => {
            assert_eq!(reported, path)
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
