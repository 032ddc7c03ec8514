//! End-to-end tests for configuration resolution

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use svc_bootstrap::config::{
    ConfigCache, ConfigError, ConfigLoader, ConfigPatch, DatabasePatch, EnvMap, NodeEnv,
};
use svc_bootstrap::db::ResetMode;
use svc_bootstrap::logger::LogLevel;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> EnvMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn shipped_config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config")
}

/// Temp dir with a `config/` subdirectory and room for a `.env`
fn workspace(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config");
    fs::create_dir(&config_dir).unwrap();
    for (name, content) in files {
        fs::write(config_dir.join(name), content).unwrap();
    }
    temp_dir
}

fn loader(temp_dir: &TempDir, live: EnvMap) -> ConfigLoader {
    ConfigLoader::with_env(live)
        .with_config_dir(temp_dir.path().join("config"))
        .with_dotenv_path(temp_dir.path().join(".env"))
}

// ============================================================================
// Shipped configuration files
// ============================================================================

#[test]
fn test_shipped_test_config_resolves() {
    let config = ConfigLoader::with_env(EnvMap::new())
        .with_config_dir(shipped_config_dir())
        .load_test(None)
        .unwrap();

    assert!(config.is_test());
    assert_eq!(config.db().reset_mode(), ResetMode::Recreate);
    assert_eq!(config.db().max_pool_connections(), 2);
    assert_eq!(config.logger().level(), LogLevel::Warn);
}

#[test]
fn test_shipped_production_config_needs_conn_string() {
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigLoader::with_env(env(&[("ENV", "production"), ("NODE_ENV", "production")]))
        .with_config_dir(shipped_config_dir())
        .with_dotenv_path(temp_dir.path().join(".env"))
        .load()
        .unwrap_err();

    let errors = err.validation_errors().unwrap();
    assert!(errors.contains("DB_CONNECTION_STRING"));
}

#[test]
fn test_shipped_production_config_with_marker() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::with_env(env(&[
        ("NODE_ENV", "production"),
        ("IS_PRODUCTION_ENV", "true"),
        ("DB_CONNECTION_STRING", "postgres://svc:pw@db.internal/svc"),
    ]))
    .with_config_dir(shipped_config_dir())
    .with_dotenv_path(temp_dir.path().join(".env"))
    .load()
    .unwrap();

    assert!(config.is_prod());
    assert_eq!(config.node_env(), NodeEnv::Production);
    assert_eq!(config.db().reset_mode(), ResetMode::None);
    assert_eq!(config.db().max_pool_connections(), 20);
    assert_eq!(config.logger().file().name(), Some("logs/svc.log"));
    assert!(!config.logger().level_is_stringified());
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_full_precedence_chain() {
    let temp_dir = workspace(&[
        (
            "staging.json",
            r#"{"PORT": 4100, "LOG_LEVEL": "debug", "DB_CONNECTION_STRING": "postgres://static/db"}"#,
        ),
        (
            "staging.secret.json",
            r#"{"PORT": 4200, "DB_CONNECTION_STRING": "postgres://secret/db", "SSE_RETRY": 250}"#,
        ),
    ]);
    fs::write(temp_dir.path().join(".env"), "LOG_LEVEL=trace\nSERVICE_NAME=from-dotenv\n").unwrap();

    let config = loader(&temp_dir, env(&[("ENV", "staging"), ("LOG_LEVEL", "error")]))
        .load()
        .unwrap();

    // live > dotenv > static > secret
    assert_eq!(config.logger().level(), LogLevel::Error);
    assert_eq!(config.service_name(), "from-dotenv");
    assert_eq!(config.port(), 4100);
    assert_eq!(config.db().conn_string(), "postgres://static/db");
    assert_eq!(config.sse().retry_ms(), 250);
    assert_eq!(config.env(), "staging");
    assert!(config.is_dev());
}

#[test]
fn test_missing_files_are_not_errors() {
    let temp_dir = workspace(&[]);
    let config = loader(
        &temp_dir,
        env(&[("NODE_ENV", "test"), ("DB_CONNECTION_STRING", "postgres://app@localhost/app")]),
    )
    .load()
    .unwrap();

    assert_eq!(config.env(), "test");
    assert_eq!(config.port(), 3000);
}

#[test]
fn test_malformed_secret_file_names_path() {
    let temp_dir = workspace(&[("development.secret.json", r#"["not", "an", "object"]"#)]);
    let err = loader(&temp_dir, EnvMap::new()).load().unwrap_err();

    match err {
        ConfigError::Load { ref path, .. } => {
            assert!(path.ends_with("development.secret.json"));
        }
        other => panic!("Expected load error, got {:?}", other),
    }
}

// ============================================================================
// Validation and consistency
// ============================================================================

#[test]
fn test_every_violation_reported_at_once() {
    let temp_dir = workspace(&[(
        "development.json",
        r#"{"PORT": "http", "LOG_FILE_LEVEL": "loud", "DB_MAX_POOL_CONNECTIONS": 0}"#,
    )]);
    let err = loader(&temp_dir, EnvMap::new()).load().unwrap_err();

    let message = err.to_string();
    for name in ["PORT", "LOG_FILE_LEVEL", "DB_MAX_POOL_CONNECTIONS", "DB_CONNECTION_STRING"] {
        assert!(message.contains(name), "{} missing from {}", name, message);
    }
}

#[test]
fn test_production_marker_in_development_is_rejected() {
    let temp_dir = workspace(&[]);
    let err = loader(
        &temp_dir,
        env(&[
            ("IS_PRODUCTION_ENV", "true"),
            ("DB_CONNECTION_STRING", "postgres://app@localhost/app"),
        ]),
    )
    .load()
    .unwrap_err();

    assert!(matches!(err, ConfigError::ProductionMismatch { .. }));
}

// ============================================================================
// Overrides and caching
// ============================================================================

#[test]
fn test_overrides_leave_base_untouched() {
    let temp_dir = workspace(&[(
        "test.json",
        r#"{"NODE_ENV": "test", "DB_CONNECTION_STRING": "postgres://test/db"}"#,
    )]);
    let loader = loader(&temp_dir, EnvMap::new());

    let base = loader.load_test(None).unwrap();
    let patched = loader
        .load_test(Some(ConfigPatch {
            db: Some(DatabasePatch {
                max_pool_connections: Some(5),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .unwrap();

    assert_eq!(base.db().max_pool_connections(), 10);
    assert_eq!(patched.db().max_pool_connections(), 5);
    assert_eq!(patched.db().conn_string(), base.db().conn_string());
}

#[test]
fn test_cache_ignores_later_environment_changes() {
    let temp_dir = workspace(&[]);
    let cache = ConfigCache::new();

    let first = cache
        .get_or_load(&loader(
            &temp_dir,
            env(&[("NODE_ENV", "test"), ("DB_CONNECTION_STRING", "postgres://a/db")]),
        ))
        .unwrap();
    let second = cache
        .get_or_load(&loader(
            &temp_dir,
            env(&[("NODE_ENV", "production"), ("DB_CONNECTION_STRING", "postgres://b/db")]),
        ))
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.db().conn_string(), "postgres://a/db");
}
