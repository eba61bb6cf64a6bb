//! Extraction settings.
//!
//! Extraction itself never reads the environment: an extractor uses the
//! [`MetadataConfig`] it was built with, [`MetadataConfig::default`] unless
//! the host says otherwise. Hosts that want file and environment settings
//! call [`MetadataConfig::load`], which reads the optional `[metadata]`
//! section of `config/config.toml` and `ENTITY_METADATA__METADATA__*`
//! environment variables. Missing keys take their defaults.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

const CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "ENTITY_METADATA";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetadataConfig {
    /// Joins nested prefixes with column and property names
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Property bag key set on columns that must not be updated
    #[serde(default = "default_read_only_key")]
    pub read_only_key: String,
    /// Collection tables nested deeper than this are not expanded
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

fn default_separator() -> String {
    ".".to_string()
}

fn default_read_only_key() -> String {
    crate::meta::READ_ONLY.to_string()
}

fn default_max_nesting_depth() -> usize {
    8
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            read_only_key: default_read_only_key(),
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

impl MetadataConfig {
    /// Load from `config/config.toml` (optional), then environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from the given TOML file (optional), then environment variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if path.exists() {
                    log::warn!(
                        "Failed to load {}, falling back to environment: {}",
                        path.display(),
                        err
                    );
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        match settings.get::<MetadataConfig>("metadata") {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Metadata configuration is invalid: {}",
                e
            ))),
        }
    }
}
