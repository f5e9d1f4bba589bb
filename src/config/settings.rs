//! TOML-based configuration for sales-profiles.
//!
//! Supports a config file (sales-profiles.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [database]
//! path = "./db.sqlite"
//!
//! [partitions]
//! current_year = 2025  # defaults to the current calendar year
//!
//! [cache]
//! default_timeout_seconds = 300  # at most 30 days
//! max_entries = 10000
//!
//! [server]
//! bind = "127.0.0.1:5000"
//! api_key = "${SALES_API_KEY}"  # omit to disable authentication
//! ```

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SALES_PROFILES_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sales-profiles.toml";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Backing store.
    pub database: DatabaseSettings,

    /// Year partitioning.
    pub partitions: PartitionSettings,

    /// Response cache.
    pub cache: CacheSettings,

    /// HTTP server.
    pub server: ServerSettings,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Path to the SQLite file (supports ${ENV_VAR} expansion).
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "./db.sqlite".to_string(),
        }
    }
}

impl DatabaseSettings {
    /// Get the database path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<PathBuf, SettingsError> {
        expand_env_vars(&self.path).map(PathBuf::from)
    }
}

/// Partition configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PartitionSettings {
    /// Boundary year: sales in this year or later are in the current partition.
    pub current_year: Option<i32>,
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Entry time-to-live in seconds.
    pub default_timeout_seconds: u64,
    /// Upper bound on stored responses.
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_timeout_seconds: cache::DEFAULT_TIMEOUT.as_secs(),
            max_entries: cache::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_seconds)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind: String,

    /// Shared secret expected in the `X-Api-Key` header (supports ${ENV_VAR}).
    pub api_key: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            api_key: None,
        }
    }
}

impl ServerSettings {
    /// Get the API key with environment variables expanded.
    pub fn resolved_api_key(&self) -> Result<Option<String>, SettingsError> {
        self.api_key.as_deref().map(expand_env_vars).transpose()
    }
}

impl Settings {
    /// Load and validate settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SALES_PROFILES_CONFIG`
    /// 2. `./sales-profiles.toml`
    /// 3. `~/.config/sales-profiles/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sales-profiles").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Check value ranges that TOML types alone cannot express.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(year) = self.partitions.current_year {
            if !(1..=9999).contains(&year) {
                return Err(SettingsError::InvalidConfig(format!(
                    "partitions.current_year must be between 1 and 9999, got {year}"
                )));
            }
        }
        let max_timeout = cache::MAX_TIMEOUT.as_secs();
        let timeout = self.cache.default_timeout_seconds;
        if !(1..=max_timeout).contains(&timeout) {
            return Err(SettingsError::InvalidConfig(format!(
                "cache.default_timeout_seconds must be between 1 and {max_timeout}, got {timeout}"
            )));
        }
        if self.cache.max_entries == 0 {
            return Err(SettingsError::InvalidConfig(
                "cache.max_entries must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The partition boundary year, falling back to today's year.
    pub fn current_year(&self) -> i32 {
        self.partitions
            .current_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name = if chars.next_if_eq(&'{').is_some() {
            let mut var_name = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                var_name.push(ch);
            }
            if !closed {
                return Err(SettingsError::InvalidConfig(format!(
                    "unterminated variable reference in {s:?}"
                )));
            }
            var_name
        } else {
            // $VAR ends at the first non-alphanumeric, non-underscore character
            let mut var_name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            var_name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
