//! Registry mapping scheme tokens to format drivers.
//!
//! The registry is built once and passed to whoever needs it. A concrete
//! scheme names its driver directly; the generic scheme picks a driver
//! from the file extension.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "csv")]
use crate::csv_reader::DelimitedTextDriver;
#[cfg(feature = "csv")]
use crate::options::CsvSettings;
use crate::reader::{FormatDriver, IoError, IoResult};
#[cfg(feature = "spreadsheet")]
use crate::spreadsheet_reader::SpreadsheetDriver;

/// Scheme that resolves its driver by file extension
pub const GENERIC_SCHEME: &str = "pds";

/// Scheme forcing the delimited-text driver
pub const CSV_SCHEME: &str = "pds-csv";

/// Scheme forcing the spreadsheet driver
pub const SPREADSHEET_SCHEME: &str = "pds-xls";

/// Registry of format drivers keyed by scheme token
pub struct FormatRegistry {
    generic: String,
    drivers: Vec<(String, Arc<dyn FormatDriver>)>,
    by_scheme: HashMap<String, usize>,
}

impl FormatRegistry {
    /// Create a registry with the built-in drivers registered.
    pub fn new() -> Self {
        let mut registry = Self::empty(GENERIC_SCHEME);
        registry.register_builtins();
        registry
    }

    /// Create a registry whose CSV driver uses the given settings.
    #[cfg(feature = "csv")]
    pub fn with_csv_settings(settings: CsvSettings) -> Self {
        let mut registry = Self::new();
        registry.register(
            CSV_SCHEME,
            Arc::new(DelimitedTextDriver::with_settings(settings)),
        );
        registry
    }

    /// Create an empty registry (for testing)
    pub fn empty(generic: impl Into<String>) -> Self {
        Self {
            generic: generic.into(),
            drivers: Vec::new(),
            by_scheme: HashMap::new(),
        }
    }

    fn register_builtins(&mut self) {
        #[cfg(feature = "csv")]
        self.register(CSV_SCHEME, Arc::new(DelimitedTextDriver::new()));

        #[cfg(feature = "spreadsheet")]
        self.register(SPREADSHEET_SCHEME, Arc::new(SpreadsheetDriver::new()));
    }

    /// Register a driver under a scheme.
    ///
    /// Registering an existing scheme replaces its driver but keeps its
    /// place in the extension lookup order.
    pub fn register(&mut self, scheme: impl Into<String>, driver: Arc<dyn FormatDriver>) {
        let scheme = scheme.into();
        let existing = self.by_scheme.get(&scheme).copied();
        match existing {
            Some(index) => self.drivers[index].1 = driver,
            None => {
                self.by_scheme.insert(scheme.clone(), self.drivers.len());
                self.drivers.push((scheme, driver));
            }
        }
    }

    /// The scheme resolved by extension
    pub fn generic_scheme(&self) -> &str {
        &self.generic
    }

    /// All accepted scheme tokens, generic first
    pub fn schemes(&self) -> Vec<&str> {
        std::iter::once(self.generic.as_str())
            .chain(self.drivers.iter().map(|(scheme, _)| scheme.as_str()))
            .collect()
    }

    pub fn is_scheme(&self, token: &str) -> bool {
        token == self.generic || self.by_scheme.contains_key(token)
    }

    /// Get the driver registered for a concrete scheme
    pub fn get(&self, scheme: &str) -> Option<Arc<dyn FormatDriver>> {
        self.by_scheme
            .get(scheme)
            .map(|&index| Arc::clone(&self.drivers[index].1))
    }

    /// Iterate over (scheme, driver) pairs in registration order
    pub fn drivers(&self) -> impl Iterator<Item = (&str, &dyn FormatDriver)> {
        self.drivers
            .iter()
            .map(|(scheme, driver)| (scheme.as_str(), driver.as_ref()))
    }

    /// Pick the driver for a scheme and file path.
    pub fn resolve(&self, scheme: &str, path: &Path) -> IoResult<Arc<dyn FormatDriver>> {
        if scheme == self.generic {
            return self.resolve_extension(path);
        }
        self.get(scheme)
            .ok_or_else(|| IoError::UnsupportedFormat(format!("unknown scheme '{}'", scheme)))
    }

    /// Pick the first registered driver supporting the path's extension.
    pub fn resolve_extension(&self, path: &Path) -> IoResult<Arc<dyn FormatDriver>> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .ok_or_else(|| {
                IoError::UnsupportedFormat(format!("no file extension in {}", path.display()))
            })?;

        let driver = self
            .drivers
            .iter()
            .find(|(_, driver)| driver.supports(&extension))
            .map(|(_, driver)| Arc::clone(driver))
            .ok_or_else(|| {
                IoError::UnsupportedFormat(format!("Unknown file extension: {}", extension))
            })?;

        tracing::debug!(
            "Resolved {} to the {} driver",
            extension,
            driver.format_name()
        );
        Ok(driver)
    }

    /// List supported file extensions
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.drivers
            .iter()
            .flat_map(|(_, driver)| driver.extensions().iter().copied())
            .collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
