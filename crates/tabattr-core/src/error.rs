//! Error types for tabattr-core
//!
//! The variants are the failures a host sees:
//! - names rejected before any attribute exists
//! - read-time failures from loading and selection
//! - writes, which always fail

use std::path::PathBuf;
use tabattr_io::IoError;
use tabattr_selector::SelectorError;
use thiserror::Error;

/// Main error type for tabular attributes
#[derive(Error, Debug)]
pub enum TabattrError {
    /// Name does not match the URI grammar, or its selector is not a literal
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// No driver for the scheme or extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Selector parses but has a shape no driver accepts
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Column label or index absent after load
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Failure while loading the file
    #[error("Failed to read {}: {source}", path.display())]
    DataSource {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Attributes are read-only
    #[error("Attribute '{0}' is read-only")]
    ReadOnlyAttribute(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl TabattrError {
    pub fn invalid_name(name: impl Into<String>, reason: impl ToString) -> Self {
        TabattrError::InvalidName {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Map a driver error raised while reading `path`
    pub fn from_io(path: impl Into<PathBuf>, err: IoError) -> Self {
        match err {
            IoError::ColumnNotFound(column) => TabattrError::ColumnNotFound(column),
            IoError::UnsupportedFormat(format) => TabattrError::UnsupportedFormat(format),
            source => TabattrError::DataSource {
                path: path.into(),
                source,
            },
        }
    }
}

impl From<SelectorError> for TabattrError {
    fn from(err: SelectorError) -> Self {
        TabattrError::InvalidSelector(err.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Unsupported config file extension: {0}")]
    UnsupportedExtension(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

/// Result type alias for tabattr operations
pub type Result<T> = std::result::Result<T, TabattrError>;
