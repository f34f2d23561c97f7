//! Configuration loading and resolution
//!
//! Every setting resolves through the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// What to do when opening a photo that another session already locked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockConflictPolicy {
    /// Surface the conflict and stay on the list
    #[default]
    Abort,
    /// Proceed to a best-effort read-only view without lock ownership
    ReadOnly,
}

impl std::str::FromStr for LockConflictPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(LockConflictPolicy::Abort),
            "readonly" | "read-only" => Ok(LockConflictPolicy::ReadOnly),
            other => Err(Error::Config(format!(
                "Unknown lock conflict policy: {other} (expected abort or readonly)"
            ))),
        }
    }
}

/// Raw TOML config file contents (all keys optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub api_base_url: Option<String>,
    pub store_path: Option<String>,
    pub lock_conflict_policy: Option<LockConflictPolicy>,
}

/// Resolved console configuration
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the evidence API gateway
    pub api_base_url: String,
    /// SQLite session store location
    pub store_path: PathBuf,
    /// Lock conflict behavior when opening a photo
    pub lock_conflict_policy: LockConflictPolicy,
}

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";

/// Resolve the full configuration from CLI args, environment, TOML and
/// defaults
pub fn resolve_config(
    cli_api_url: Option<&str>,
    cli_store_path: Option<&str>,
    cli_lock_policy: Option<LockConflictPolicy>,
) -> Result<ConsoleConfig> {
    let toml_config = load_toml_config().unwrap_or_default();

    let api_base_url = resolve_string(
        cli_api_url,
        "VELO_API_URL",
        toml_config.api_base_url.as_deref(),
        DEFAULT_API_BASE_URL,
    );

    let store_path = match resolve_optional(
        cli_store_path,
        "VELO_STORE_PATH",
        toml_config.store_path.as_deref(),
    ) {
        Some(path) => PathBuf::from(path),
        None => default_store_path(),
    };

    let lock_conflict_policy = match cli_lock_policy {
        Some(policy) => policy,
        None => match std::env::var("VELO_LOCK_CONFLICT") {
            Ok(value) => value.parse()?,
            Err(_) => toml_config.lock_conflict_policy.unwrap_or_default(),
        },
    };

    Ok(ConsoleConfig {
        api_base_url,
        store_path,
        lock_conflict_policy,
    })
}

fn resolve_string(
    cli: Option<&str>,
    env_var: &str,
    toml_value: Option<&str>,
    default: &str,
) -> String {
    resolve_optional(cli, env_var, toml_value).unwrap_or_else(|| default.to_string())
}

fn resolve_optional(cli: Option<&str>, env_var: &str, toml_value: Option<&str>) -> Option<String> {
    if let Some(value) = cli {
        return Some(value.to_string());
    }
    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }
    toml_value.map(|v| v.to_string())
}

/// Load the TOML config file if one exists at the platform config location
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    if !path.exists() {
        return Ok(TomlConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read config failed: {e}")))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse config failed: {e}")))
}

/// Platform config file path: `<config dir>/velo/console.toml`
fn config_file_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("velo").join("console.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Default session store path: `<local data dir>/velo/session.db`
fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("velo").join("session.db"))
        .unwrap_or_else(|| PathBuf::from("./velo-session.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_takes_priority() {
        let config = resolve_config(Some("http://api.example:8080"), None, None).unwrap();
        assert_eq!(config.api_base_url, "http://api.example:8080");
    }

    #[test]
    fn test_default_api_url_when_unconfigured() {
        // No CLI argument; env may be unset in test environment
        std::env::remove_var("VELO_API_URL");
        let config = resolve_config(None, None, None).unwrap();
        assert!(!config.api_base_url.is_empty());
    }

    #[test]
    fn test_lock_policy_parsing() {
        assert_eq!(
            "abort".parse::<LockConflictPolicy>().unwrap(),
            LockConflictPolicy::Abort
        );
        assert_eq!(
            "ReadOnly".parse::<LockConflictPolicy>().unwrap(),
            LockConflictPolicy::ReadOnly
        );
        assert!("block".parse::<LockConflictPolicy>().is_err());
    }

    #[test]
    fn test_cli_lock_policy_overrides_default() {
        let config = resolve_config(None, None, Some(LockConflictPolicy::ReadOnly)).unwrap();
        assert_eq!(config.lock_conflict_policy, LockConflictPolicy::ReadOnly);
    }

    #[test]
    fn test_toml_parses_all_keys() {
        let parsed: TomlConfig = toml::from_str(
            r#"
            api_base_url = "http://camera-api:3000"
            store_path = "/var/lib/velo/session.db"
            lock_conflict_policy = "readonly"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.api_base_url.as_deref(), Some("http://camera-api:3000"));
        assert_eq!(
            parsed.lock_conflict_policy,
            Some(LockConflictPolicy::ReadOnly)
        );
    }
}
