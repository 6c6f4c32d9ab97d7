//! Session configuration

use std::path::PathBuf;

use serde::Deserialize;

use infra_store::StoreConfig;

/// Environment variable prefix for every setting
pub const ENV_PREFIX: &str = "ALLOCATOR";

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Path of the JSON store file
    pub store_path: PathBuf,
    /// Keep profiles in memory only
    pub in_memory: bool,
    /// Write the store file as indented JSON
    pub pretty_store: bool,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("allocator-store.json"),
            in_memory: false,
            pretty_store: false,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl SessionConfig {
    /// Loads configuration from `ALLOCATOR_*` environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// Loads a `.env` file if present, then reads the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Loads configuration from an explicit set of variables instead of the
    /// process environment
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self, config::ConfigError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
            .build()?
            .try_deserialize()
    }

    /// The store configuration these settings describe
    pub fn store_config(&self) -> StoreConfig {
        if self.in_memory {
            return StoreConfig::in_memory();
        }
        StoreConfig::new(&self.store_path).pretty(self.pretty_store)
    }
}
