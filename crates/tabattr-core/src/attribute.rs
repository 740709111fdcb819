//! Read-only tabular attributes
//!
//! An attribute re-reads its file on every uncached read: the selector is
//! parsed, the driver loads and selects, and the result is coerced. The
//! last successful value is kept; failed reads leave it untouched.

use crate::coerce::coerce;
use crate::config::AttributeConfig;
use crate::error::{Result, TabattrError};
use crate::validator::{AuthorityLocator, DeviceLocator, NameSet, ResourceLocator};
use crate::value::TypedValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tabattr_io::FormatDriver;
use tabattr_selector::parse_selector;

/// A value together with the time it was read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadValue {
    pub rvalue: TypedValue,
    pub time: DateTime<Utc>,
}

/// The local host serving files
#[derive(Debug, Clone)]
pub struct TabularAuthority {
    locator: AuthorityLocator,
}

impl TabularAuthority {
    pub(crate) fn new(locator: AuthorityLocator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &AuthorityLocator {
        &self.locator
    }

    pub fn names(&self) -> NameSet {
        self.locator.names()
    }
}

/// A file on the local host
#[derive(Debug, Clone)]
pub struct TabularDevice {
    locator: DeviceLocator,
}

impl TabularDevice {
    pub(crate) fn new(locator: DeviceLocator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &DeviceLocator {
        &self.locator
    }

    /// Normalized file path
    pub fn path(&self) -> &Path {
        Path::new(&self.locator.device_path)
    }

    pub fn names(&self) -> NameSet {
        self.locator.names()
    }
}

/// A selection inside a file, exposed as a read-only value
pub struct TabularAttribute {
    locator: ResourceLocator,
    driver: Arc<dyn FormatDriver>,
    config: AttributeConfig,
    last: Mutex<Option<ReadValue>>,
}

impl TabularAttribute {
    pub(crate) fn new(
        locator: ResourceLocator,
        driver: Arc<dyn FormatDriver>,
        config: AttributeConfig,
    ) -> Self {
        Self {
            locator,
            driver,
            config,
            last: Mutex::new(None),
        }
    }

    pub fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    pub fn names(&self) -> NameSet {
        self.locator.names()
    }

    pub fn device(&self) -> TabularDevice {
        TabularDevice::new(self.locator.device())
    }

    /// Name of the driver reading the file
    pub fn format_name(&self) -> &'static str {
        self.driver.format_name()
    }

    /// Read the value, serving the cached one when allowed
    pub fn read(&self, cache: bool) -> Result<ReadValue> {
        if cache && self.config.cache_reads {
            if let Some(value) = self.last_value() {
                return Ok(value);
            }
        }
        self.poll()
    }

    /// Re-read the file and remember the result
    pub fn poll(&self) -> Result<ReadValue> {
        let value = ReadValue {
            rvalue: self.fetch()?,
            time: Utc::now(),
        };
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.clone());
        Ok(value)
    }

    /// Last successfully read value
    pub fn last_value(&self) -> Option<ReadValue> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_writable(&self) -> bool {
        false
    }

    /// Always fails: files are never written through attributes
    pub fn write(&self, _value: &TypedValue) -> Result<()> {
        Err(TabattrError::ReadOnlyAttribute(self.names().complete))
    }

    pub fn is_using_events(&self) -> bool {
        self.config.use_events
    }

    pub fn is_polling_enabled(&self) -> bool {
        self.config.polling_enabled
    }

    pub fn polling_period(&self) -> Duration {
        Duration::from_millis(self.config.polling_period_ms)
    }

    fn fetch(&self) -> Result<TypedValue> {
        let request = parse_selector(&self.locator.selector, self.driver.layout())?;
        let path = Path::new(&self.locator.device_path);
        let table = self
            .driver
            .read(path, &request)
            .map_err(|e| TabattrError::from_io(path, e))?;
        tracing::debug!(
            "Read {} rows x {} columns for {}",
            table.num_rows(),
            table.num_columns(),
            self.locator
        );
        Ok(coerce(&table))
    }
}

impl std::fmt::Debug for TabularAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabularAttribute")
            .field("locator", &self.locator)
            .field("format", &self.driver.format_name())
            .finish()
    }
}
