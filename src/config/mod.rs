//! Configuration module for sales-profiles.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, CacheSettings, DatabaseSettings, PartitionSettings, ServerSettings, Settings,
    SettingsError, CONFIG_ENV_VAR, LOCAL_CONFIG_FILE,
};
