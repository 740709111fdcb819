//! Format driver trait and common types
//!
//! A `FormatDriver` loads a file into a [`Table`]. Drivers are stateless:
//! everything a load needs arrives through [`LoadOptions`].

use crate::options::LoadOptions;
use crate::select::select_table;
use crate::table::Table;
use std::path::Path;
use tabattr_selector::{SelectionRequest, Slot};
use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),

    #[error("Invalid value for option '{name}': {message}")]
    InvalidOption { name: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// A file-format driver
pub trait FormatDriver: Send + Sync {
    /// Get the format name
    fn format_name(&self) -> &'static str;

    /// File extensions this driver reads, dot included
    fn extensions(&self) -> &'static [&'static str];

    /// Check whether the driver reads files with this extension
    ///
    /// The comparison is case-sensitive and includes the dot.
    fn supports(&self, extension: &str) -> bool {
        self.extensions().contains(&extension)
    }

    /// Meaning of positional selector arguments for this format
    fn layout(&self) -> &'static [Slot];

    /// Turn a selection request into loader options
    fn load_options(&self, request: &SelectionRequest) -> IoResult<LoadOptions>;

    /// Load a whole table from a file
    fn load(&self, path: &Path, options: &LoadOptions) -> IoResult<Table>;

    /// Load a file and apply the request's column and row selection
    fn read(&self, path: &Path, request: &SelectionRequest) -> IoResult<Table> {
        let options = self.load_options(request)?;
        tracing::debug!(
            "Loading {} file {}",
            self.format_name(),
            path.display()
        );
        let table = self.load(path, &options)?;
        select_table(table, request)
    }
}

/// Fail early with `FileNotFound` before handing a path to a parser
pub(crate) fn ensure_exists(path: &Path) -> IoResult<()> {
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}
