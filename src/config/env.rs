//! Environment snapshots and the fill-only merge
//!
//! The pipeline never writes to the real process environment. It takes a
//! snapshot, fills the gaps from lower-precedence sources and hands the
//! result to the schema validator.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::environment::NodeEnv;
use crate::config::error::ConfigError;

/// Flat environment mapping, name to raw string value
pub type EnvMap = BTreeMap<String, String>;

/// Variable holding the deployment scope tag
pub const ENV_VAR: &str = "ENV";

/// Tag used when neither `ENV` nor `NODE_ENV` is set
pub const DEFAULT_ENV: &str = "development";

/// Tag used by the test resolver when neither `ENV` nor `NODE_ENV` is set
pub const DEFAULT_TEST_ENV: &str = "test";

/// Name of the dotenv file read from the working directory
pub const DOTENV_FILE: &str = ".env";

/// Snapshot the live process environment
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn process_env() -> EnvMap {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Resolve the environment tag: `ENV`, then `NODE_ENV`, then `fallback`
///
/// Empty values count as unset.
pub fn resolve_env_tag(live: &EnvMap, fallback: &str) -> String {
    [ENV_VAR, NodeEnv::ENV_VAR]
        .iter()
        .filter_map(|name| live.get(*name))
        .find(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

/// Default overlay applied right below the live environment
pub fn default_overlay(env_tag: &str) -> EnvMap {
    EnvMap::from([
        (ENV_VAR.to_string(), env_tag.to_string()),
        (
            NodeEnv::ENV_VAR.to_string(),
            NodeEnv::Development.as_str().to_string(),
        ),
    ])
}

/// Insert every entry of `source` whose key is absent from `target`
pub fn fill_missing(target: &mut EnvMap, source: &EnvMap) {
    for (key, value) in source {
        target
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}

/// Build the effective environment
///
/// Precedence, highest first: `live` > `defaults` > `static_env` > `secret`.
/// A key present in `live` is never altered or removed.
///
/// Note the tail of the order: a committed static value is not shadowed by
/// the secret overlay. The secret file only fills keys the static file
/// leaves out.
pub fn merge_env(live: &EnvMap, defaults: &EnvMap, secret: &EnvMap, static_env: &EnvMap) -> EnvMap {
    let mut merged = live.clone();
    for source in [defaults, static_env, secret] {
        fill_missing(&mut merged, source);
    }
    merged
}

/// Fill `live` from a dotenv file without overriding keys it already has
///
/// A missing file is not an error. Parse errors report the position only,
/// never the line contents, so secrets do not leak into startup logs.
pub fn load_dotenv(live: &mut EnvMap, path: &Path) -> Result<(), ConfigError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(()),
        Err(e) => return Err(dotenv_error(path, e)),
    };

    for item in iter {
        let (key, value) = item.map_err(|e| dotenv_error(path, e))?;
        live.entry(key).or_insert(value);
    }

    Ok(())
}

fn dotenv_error(path: &Path, error: dotenvy::Error) -> ConfigError {
    match error {
        dotenvy::Error::LineParse(_, index) => {
            ConfigError::load(path, format!("invalid syntax at position {}", index))
        }
        dotenvy::Error::Io(io_err) => ConfigError::load(path, io_err.to_string()),
        _ => ConfigError::load(path, "unreadable dotenv file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_env_tag_order() {
        assert_eq!(
            resolve_env_tag(&env(&[("ENV", "staging"), ("NODE_ENV", "production")]), DEFAULT_ENV),
            "staging"
        );
        assert_eq!(resolve_env_tag(&env(&[("NODE_ENV", "production")]), DEFAULT_ENV), "production");
        assert_eq!(resolve_env_tag(&env(&[]), DEFAULT_ENV), "development");
        assert_eq!(resolve_env_tag(&env(&[]), DEFAULT_TEST_ENV), "test");
    }

    #[test]
    fn test_resolve_env_tag_skips_empty_values() {
        assert_eq!(
            resolve_env_tag(&env(&[("ENV", ""), ("NODE_ENV", "test")]), DEFAULT_ENV),
            "test"
        );
    }

    #[test]
    fn test_merge_static_beats_secret() {
        let merged = merge_env(
            &env(&[]),
            &env(&[]),
            &env(&[("DB_CONNECTION_STRING", "postgres://secret/db")]),
            &env(&[("DB_CONNECTION_STRING", "postgres://static/db")]),
        );
        assert_eq!(merged["DB_CONNECTION_STRING"], "postgres://static/db");
    }

    #[test]
    fn test_merge_defaults_beat_files() {
        let merged = merge_env(
            &env(&[]),
            &default_overlay("staging"),
            &env(&[("ENV", "from-secret")]),
            &env(&[("NODE_ENV", "production"), ("ENV", "from-static")]),
        );
        assert_eq!(merged["ENV"], "staging");
        assert_eq!(merged["NODE_ENV"], "development");
    }

    #[test]
    fn test_merge_secret_fills_gaps() {
        let merged = merge_env(
            &env(&[("PORT", "8080")]),
            &env(&[]),
            &env(&[("DB_CONNECTION_STRING", "postgres://secret/db")]),
            &env(&[("LOG_LEVEL", "debug")]),
        );
        assert_eq!(merged["PORT"], "8080");
        assert_eq!(merged["DB_CONNECTION_STRING"], "postgres://secret/db");
        assert_eq!(merged["LOG_LEVEL"], "debug");
    }

    #[test]
    fn test_load_dotenv_does_not_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        std::fs::write(&path, "PORT=9000\nLOG_LEVEL=debug\n").unwrap();

        let mut live = env(&[("PORT", "3001")]);
        load_dotenv(&mut live, &path).unwrap();

        assert_eq!(live["PORT"], "3001");
        assert_eq!(live["LOG_LEVEL"], "debug");
    }

    #[test]
    fn test_load_dotenv_missing_file_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let mut live = env(&[]);
        load_dotenv(&mut live, &temp_dir.path().join(".env")).unwrap();
        assert!(live.is_empty());
    }

    #[test]
    fn test_load_dotenv_parse_error_hides_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        std::fs::write(&path, "DB_PASSWORD hunter2\n").unwrap();

        let err = load_dotenv(&mut env(&[]), &path).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
        assert!(!err.to_string().contains("hunter2"));
    }

    fn arb_env() -> impl Strategy<Value = EnvMap> {
        prop::collection::btree_map("[A-C]{1,2}", "[a-z0-9]{0,4}", 0..6)
    }

    proptest! {
        #[test]
        fn prop_live_always_wins(
            live in arb_env(),
            defaults in arb_env(),
            secret in arb_env(),
            static_env in arb_env(),
        ) {
            let merged = merge_env(&live, &defaults, &secret, &static_env);
            for (key, value) in &live {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }

        #[test]
        fn prop_merge_never_drops_keys(
            live in arb_env(),
            secret in arb_env(),
            static_env in arb_env(),
        ) {
            let merged = merge_env(&live, &EnvMap::new(), &secret, &static_env);
            for key in live.keys().chain(secret.keys()).chain(static_env.keys()) {
                prop_assert!(merged.contains_key(key));
            }
            prop_assert!(merged.len() <= live.len() + secret.len() + static_env.len());
        }

        #[test]
        fn prop_static_value_wins_over_secret_when_live_absent(
            key in "[A-C]{1,2}",
            secret_value in "[a-z]{1,4}",
            static_value in "[0-9]{1,4}",
        ) {
            let merged = merge_env(
                &EnvMap::new(),
                &EnvMap::new(),
                &EnvMap::from([(key.clone(), secret_value)]),
                &EnvMap::from([(key.clone(), static_value.clone())]),
            );
            prop_assert_eq!(merged.get(&key), Some(&static_value));
        }
    }
}
