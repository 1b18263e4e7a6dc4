//! # jschema-config
//!
//! Layered configuration loading for jschema using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`JSCHEMA_*` prefix, `__` as separator)
//! 2. Project-level `jschema.toml`
//! 3. User-level `~/.config/jschema/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `JSCHEMA_REF_PREFIX` -> `ref_prefix` and
//! `JSCHEMA_HANDLERS__RAW_JSON` -> `handlers.raw_json`.
//!
//! # Usage
//!
//! ```no_run
//! use jschema_config::SchemasConfig;
//!
//! let config = SchemasConfig::load().expect("config");
//! println!("refs resolve under {}", config.ref_prefix);
//! ```

mod error;
mod handlers;

pub use error::ConfigError;
pub use handlers::HandlerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reference prefix used when none is configured.
pub const DEFAULT_REF_PREFIX: &str = "#/$defs";

fn default_ref_prefix() -> String {
    DEFAULT_REF_PREFIX.to_string()
}

const fn default_pretty() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchemasConfig {
    /// Prefix of every `$ref`, e.g. `#/components/schemas`.
    #[serde(default = "default_ref_prefix")]
    pub ref_prefix: String,

    /// Pretty-print exported JSON.
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    #[serde(default)]
    pub handlers: HandlerConfig,
}

impl Default for SchemasConfig {
    fn default() -> Self {
        Self {
            ref_prefix: default_ref_prefix(),
            pretty: default_pretty(),
            handlers: HandlerConfig::default(),
        }
    }
}

impl SchemasConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if the merged values fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`SchemasConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from("jschema.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("JSCHEMA_").split("__"))
    }

    /// Check field values that serde cannot express.
    ///
    /// An empty `ref_prefix` is allowed and means [`DEFAULT_REF_PREFIX`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `ref_prefix` is not a local
    /// fragment (`#...`) or ends with `/`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ref_prefix.is_empty() {
            return Ok(());
        }
        if !self.ref_prefix.starts_with('#') {
            return Err(ConfigError::InvalidValue {
                field: "ref_prefix".to_string(),
                reason: format!("'{}' must start with '#'", self.ref_prefix),
            });
        }
        if self.ref_prefix.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "ref_prefix".to_string(),
                reason: format!("'{}' must not end with '/'", self.ref_prefix),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jschema").join("config.toml"))
    }
}
