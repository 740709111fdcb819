//! Name validation and canonicalization
//!
//! Names address authorities, devices (files) and attributes (selections
//! inside a file):
//!
//! ```text
//! pds://localhost
//! pds:[//localhost]/data/file.csv
//! pds:[//localhost]/data/file.csv::["col"],[0,10]
//! ```
//!
//! The scheme alternation comes from the format registry. A name whose
//! generic scheme has no driver for the path's extension, or whose
//! selector does not parse, is invalid.

use crate::config::{NamingConfig, LOCALHOST_AUTHORITY};
use crate::error::{ConfigError, Result, TabattrError};
use crate::path::{basename, normalize, SEGMENT_PATTERN};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tabattr_io::{FormatDriver, FormatRegistry};
use tabattr_selector::parse_selector;

/// Authority part of a name
const AUTHORITY_PATTERN: &str = r"(?P<authority>//[^/\s:]+)";

/// Absolute path with an optional drive prefix and no trailing slash
fn path_pattern() -> String {
    format!(
        r"(?P<path>/(?://+)?(?:[A-Za-z]:/)?(?:{segment}/+)*{segment})",
        segment = SEGMENT_PATTERN
    )
}

/// Separator between device path and selector
pub const SELECTOR_SEPARATOR: &str = "::";

/// The three display forms of a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSet {
    /// Fully qualified name, parseable back to the same locator
    pub complete: String,
    /// Name without scheme and authority
    pub normal: String,
    /// Shortest readable name
    pub short: String,
}

/// A parsed authority name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorityLocator {
    pub scheme: String,
    pub authority: String,
}

impl AuthorityLocator {
    pub fn names(&self) -> NameSet {
        NameSet {
            complete: format!("{}:{}", self.scheme, self.authority),
            normal: self.authority.clone(),
            short: self.authority.trim_start_matches('/').to_string(),
        }
    }
}

/// A parsed device name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceLocator {
    pub scheme: String,
    pub authority: String,
    /// Normalized absolute path
    pub device_path: String,
}

impl DeviceLocator {
    pub fn names(&self) -> NameSet {
        NameSet {
            complete: format!("{}:{}{}", self.scheme, self.authority, self.device_path),
            normal: self.device_path.clone(),
            short: basename(&self.device_path).to_string(),
        }
    }
}

/// A parsed attribute name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceLocator {
    pub scheme: String,
    pub authority: String,
    /// Normalized absolute path
    pub device_path: String,
    /// Raw selector text, possibly empty
    pub selector: String,
}

impl ResourceLocator {
    pub fn device(&self) -> DeviceLocator {
        DeviceLocator {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            device_path: self.device_path.clone(),
        }
    }

    pub fn names(&self) -> NameSet {
        let short = if self.selector.is_empty() {
            basename(&self.device_path).to_string()
        } else {
            self.selector.clone()
        };
        NameSet {
            complete: format!(
                "{}:{}{}{}{}",
                self.scheme, self.authority, self.device_path, SELECTOR_SEPARATOR, self.selector
            ),
            normal: format!("{}{}{}", self.device_path, SELECTOR_SEPARATOR, self.selector),
            short,
        }
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().complete)
    }
}

/// Validator for authority, device and attribute names
pub struct NameValidator {
    registry: Arc<FormatRegistry>,
    naming: NamingConfig,
    authority_re: Regex,
    device_re: Regex,
    attribute_re: Regex,
}

impl NameValidator {
    /// Build the name grammar for the registry's schemes
    pub fn new(registry: Arc<FormatRegistry>, naming: NamingConfig) -> Result<Self> {
        let mut schemes: Vec<&str> = registry.schemes();
        schemes.sort_by_key(|s| std::cmp::Reverse(s.len()));
        let scheme = format!(
            "(?P<scheme>{})",
            schemes
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|")
        );

        let compile = |pattern: String| Regex::new(&pattern).map_err(ConfigError::from);
        let authority_re = compile(format!(r"^{}:{}$", scheme, AUTHORITY_PATTERN))?;
        let device_re = compile(format!(
            r"^{}:{}?{}$",
            scheme,
            AUTHORITY_PATTERN,
            path_pattern()
        ))?;
        let attribute_re = compile(format!(
            r"^{}:{}?{}{}(?P<selector>\S*)$",
            scheme,
            AUTHORITY_PATTERN,
            path_pattern(),
            SELECTOR_SEPARATOR
        ))?;

        Ok(Self {
            registry,
            naming,
            authority_re,
            device_re,
            attribute_re,
        })
    }

    pub fn registry(&self) -> &Arc<FormatRegistry> {
        &self.registry
    }

    /// Parse `<scheme>://localhost`
    pub fn parse_authority(&self, name: &str) -> Result<AuthorityLocator> {
        let caps = self
            .authority_re
            .captures(name)
            .ok_or_else(|| TabattrError::invalid_name(name, "not an authority name"))?;
        let authority = self.authority(name, caps.name("authority").map(|m| m.as_str()))?;
        Ok(AuthorityLocator {
            scheme: caps["scheme"].to_string(),
            authority,
        })
    }

    /// Parse `<scheme>:[//localhost]<path>`
    pub fn parse_device(&self, name: &str) -> Result<DeviceLocator> {
        let caps = self
            .device_re
            .captures(name)
            .ok_or_else(|| TabattrError::invalid_name(name, "not a device name"))?;
        let authority = self.authority(name, caps.name("authority").map(|m| m.as_str()))?;
        let scheme = caps["scheme"].to_string();
        let device_path = self.device_path(name, &caps["path"])?;
        self.driver_for(name, &scheme, &device_path)?;

        Ok(DeviceLocator {
            scheme,
            authority,
            device_path,
        })
    }

    /// Parse `<scheme>:[//localhost]<path>::<selector>`
    pub fn parse_attribute(&self, name: &str) -> Result<ResourceLocator> {
        let caps = self
            .attribute_re
            .captures(name)
            .ok_or_else(|| TabattrError::invalid_name(name, "not an attribute name"))?;
        let authority = self.authority(name, caps.name("authority").map(|m| m.as_str()))?;

        let selector = caps["selector"].to_string();
        if selector.contains(SELECTOR_SEPARATOR) {
            return Err(TabattrError::invalid_name(
                name,
                format!("selector may not contain '{}'", SELECTOR_SEPARATOR),
            ));
        }

        let scheme = caps["scheme"].to_string();
        let device_path = self.device_path(name, &caps["path"])?;
        let driver = self.driver_for(name, &scheme, &device_path)?;
        parse_selector(&selector, driver.layout())
            .map_err(|e| TabattrError::invalid_name(name, e))?;

        tracing::debug!(
            "Parsed attribute {} as {} driver on {}",
            name,
            driver.format_name(),
            device_path
        );
        Ok(ResourceLocator {
            scheme,
            authority,
            device_path,
            selector,
        })
    }

    pub fn is_valid_authority(&self, name: &str) -> bool {
        self.parse_authority(name).is_ok()
    }

    pub fn is_valid_device(&self, name: &str) -> bool {
        self.parse_device(name).is_ok()
    }

    pub fn is_valid_attribute(&self, name: &str) -> bool {
        self.parse_attribute(name).is_ok()
    }

    /// Resolve the driver that reads a locator's file
    pub fn driver(&self, locator: &ResourceLocator) -> Result<Arc<dyn FormatDriver>> {
        self.registry
            .resolve(&locator.scheme, Path::new(&locator.device_path))
            .map_err(|e| TabattrError::from_io(&locator.device_path, e))
    }

    fn authority(&self, name: &str, given: Option<&str>) -> Result<String> {
        let authority = given.unwrap_or(&self.naming.default_authority);
        if authority != LOCALHOST_AUTHORITY {
            return Err(TabattrError::invalid_name(
                name,
                format!("authority must be {}, got {}", LOCALHOST_AUTHORITY, authority),
            ));
        }
        Ok(authority.to_string())
    }

    fn device_path(&self, name: &str, raw: &str) -> Result<String> {
        let path = normalize(raw, self.naming.resolve_symlinks);
        if path.ends_with('/') {
            return Err(TabattrError::invalid_name(
                name,
                format!("path {} does not name a file", path),
            ));
        }
        Ok(path)
    }

    fn driver_for(&self, name: &str, scheme: &str, path: &str) -> Result<Arc<dyn FormatDriver>> {
        self.registry
            .resolve(scheme, Path::new(path))
            .map_err(|e| TabattrError::invalid_name(name, e))
    }
}
