//! Configuration
//!
//! Resolution order, later wins:
//! 1. Built-in defaults
//! 2. Config file (`--config PATH`, else `~/.config/guard/config.toml` if it exists)
//! 3. Environment variables (`GUARD_DB_URL`, `GUARD_DB_KEY`,
//!    `GUARD_DB_TIMEOUT_SECS`, `GUARD_USER_ID`)
//!
//! ```toml
//! [database]
//! url = "https://project.supabase.co"
//! api_key = "service-role-key"
//! timeout_secs = 30
//!
//! [defaults]
//! user_id = "5c1d..."
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const DB_URL_ENV: &str = "GUARD_DB_URL";
pub const DB_KEY_ENV: &str = "GUARD_DB_KEY";
pub const DB_TIMEOUT_ENV: &str = "GUARD_DB_TIMEOUT_SECS";
pub const USER_ID_ENV: &str = "GUARD_USER_ID";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosted database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Project base URL; the REST interface lives under `/rest/v1`
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_url: Option<String>,
    pub db_key: Option<String>,
    pub timeout: Duration,
    /// User the CLI acts on behalf of
    pub user_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_url: None,
            db_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_id: None,
        }
    }
}

impl Config {
    /// Load from the given or default config file, then apply environment
    /// overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a config file; a missing explicit path is an error
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        parse_config(&content)
    }

    /// Override values from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DB_URL_ENV).filter(|v| !v.is_empty()) {
            self.db_url = Some(url);
        }
        if let Some(key) = lookup(DB_KEY_ENV).filter(|v| !v.is_empty()) {
            self.db_key = Some(key);
        }
        if let Some(timeout) = lookup(DB_TIMEOUT_ENV).filter(|v| !v.is_empty()) {
            let secs: u64 = timeout.parse().map_err(|_| {
                Error::Config(format!("{} must be a number of seconds", DB_TIMEOUT_ENV))
            })?;
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(user) = lookup(USER_ID_ENV).filter(|v| !v.is_empty()) {
            self.user_id = Some(user);
        }
        Ok(())
    }

    /// Database settings, required by every remote operation
    pub fn database(&self) -> Result<DatabaseConfig> {
        let url = self.db_url.clone().ok_or_else(|| {
            Error::Config(format!(
                "Database URL not configured. Set {} or [database].url in the config file",
                DB_URL_ENV
            ))
        })?;
        let api_key = self.db_key.clone().ok_or_else(|| {
            Error::Config(format!(
                "Database API key not configured. Set {} or [database].api_key in the config file",
                DB_KEY_ENV
            ))
        })?;

        Ok(DatabaseConfig {
            url: url.trim_end_matches('/').to_string(),
            api_key,
            timeout: self.timeout,
        })
    }
}

/// Default config location (`~/.config/guard/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("guard").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    database: Option<RawDatabase>,
    defaults: Option<RawDefaults>,
}

#[derive(Debug, Deserialize)]
struct RawDatabase {
    url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawDefaults {
    user_id: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut config = Config::default();

    if let Some(database) = raw.database {
        config.db_url = database.url;
        config.db_key = database.api_key;
        if let Some(timeout) = database.timeout_secs {
            config.timeout = Duration::from_secs(timeout);
        }
    }

    if let Some(defaults) = raw.defaults {
        config.user_id = defaults.user_id;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [database]
            url = "https://demo.supabase.co/"
            api_key = "secret"
            timeout_secs = 5

            [defaults]
            user_id = "user-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_id.as_deref(), Some("user-1"));

        let db = config.database().unwrap();
        assert_eq!(db.url, "https://demo.supabase.co");
        assert_eq!(db.api_key, "secret");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert!(matches!(config.database(), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            parse_config("[database\nurl = 1"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = parse_config(
            r#"
            [database]
            url = "https://file.example"
            api_key = "file-key"
            "#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            (DB_URL_ENV, "https://env.example"),
            (DB_TIMEOUT_ENV, "12"),
            (USER_ID_ENV, "user-env"),
        ]
        .into_iter()
        .collect();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        let db = config.database().unwrap();
        assert_eq!(db.url, "https://env.example");
        assert_eq!(db.api_key, "file-key");
        assert_eq!(db.timeout, Duration::from_secs(12));
        assert_eq!(config.user_id.as_deref(), Some("user-env"));
    }

    #[test]
    fn test_bad_timeout_env() {
        let mut config = Config::default();
        let result = config.apply_env(|key| (key == DB_TIMEOUT_ENV).then(|| "soon".to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nurl = \"https://x.example\"\napi_key = \"k\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.db_url.as_deref(), Some("https://x.example"));

        assert!(Config::from_file(Path::new("/nonexistent/guard.toml")).is_err());
    }
}
