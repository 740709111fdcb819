//! Configuration for tabattr-core
//!
//! Naming, attribute behaviour and delimited-text defaults. Every
//! polling and event flag is explicit here rather than implied by the
//! attribute type.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tabattr_io::CsvSettings;

/// The only authority a name may carry
pub const LOCALHOST_AUTHORITY: &str = "//localhost";

/// System-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabattrConfig {
    /// Name parsing and canonicalization
    pub naming: NamingConfig,
    /// Attribute read behaviour
    pub attribute: AttributeConfig,
    /// Defaults for delimited-text files
    pub csv: CsvSettings,
}

/// Name parsing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Authority used when a name omits one
    pub default_authority: String,
    /// Resolve symlinks of existing paths after lexical normalization
    pub resolve_symlinks: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            default_authority: LOCALHOST_AUTHORITY.to_string(),
            resolve_symlinks: true,
        }
    }
}

/// Attribute behaviour configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    /// Report event support to the host
    pub use_events: bool,
    /// Let the host poll attributes
    pub polling_enabled: bool,
    /// Suggested polling period in milliseconds
    pub polling_period_ms: u64,
    /// Serve cached values to reads that allow it
    pub cache_reads: bool,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            use_events: false,
            polling_enabled: true,
            polling_period_ms: 3000,
            cache_reads: true,
        }
    }
}

impl TabattrConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load and validate a `.toml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&text)?,
            Some("json") => Self::from_json(&text)?,
            other => {
                return Err(ConfigError::UnsupportedExtension(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };
        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.naming.default_authority != LOCALHOST_AUTHORITY {
            return Err(ConfigError::OutOfRange(format!(
                "default_authority must be {}, got '{}'",
                LOCALHOST_AUTHORITY, self.naming.default_authority
            )));
        }

        if !self.csv.delimiter.is_ascii() || self.csv.delimiter == '\n' {
            return Err(ConfigError::OutOfRange(format!(
                "csv delimiter must be a single ASCII character, got {:?}",
                self.csv.delimiter
            )));
        }

        if self.attribute.polling_period_ms == 0 {
            return Err(ConfigError::OutOfRange(
                "polling_period_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
