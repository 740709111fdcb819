//! Explicit attribute factory
//!
//! One factory owns the registry, the name grammar and the configuration.
//! Attributes are shared per complete name for the factory's lifetime.

use crate::attribute::{TabularAttribute, TabularAuthority, TabularDevice};
use crate::config::TabattrConfig;
use crate::error::Result;
use crate::validator::NameValidator;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tabattr_io::FormatRegistry;

/// Creates authorities, devices and attributes from names
pub struct AttributeFactory {
    validator: NameValidator,
    config: TabattrConfig,
    attributes: Mutex<HashMap<String, Arc<TabularAttribute>>>,
}

impl AttributeFactory {
    /// Create a factory with the built-in drivers
    pub fn new(config: TabattrConfig) -> Result<Self> {
        let registry = FormatRegistry::with_csv_settings(config.csv.clone());
        Self::with_registry(Arc::new(registry), config)
    }

    /// Create a factory over an existing registry
    pub fn with_registry(registry: Arc<FormatRegistry>, config: TabattrConfig) -> Result<Self> {
        config.validate()?;
        let validator = NameValidator::new(registry, config.naming.clone())?;
        Ok(Self {
            validator,
            config,
            attributes: Mutex::new(HashMap::new()),
        })
    }

    pub fn validator(&self) -> &NameValidator {
        &self.validator
    }

    pub fn registry(&self) -> &FormatRegistry {
        self.validator.registry()
    }

    pub fn config(&self) -> &TabattrConfig {
        &self.config
    }

    pub fn authority(&self, name: &str) -> Result<TabularAuthority> {
        Ok(TabularAuthority::new(self.validator.parse_authority(name)?))
    }

    pub fn device(&self, name: &str) -> Result<TabularDevice> {
        Ok(TabularDevice::new(self.validator.parse_device(name)?))
    }

    /// Get or create the attribute for a name
    ///
    /// Invalid names fail before anything is created.
    pub fn attribute(&self, name: &str) -> Result<Arc<TabularAttribute>> {
        let locator = self.validator.parse_attribute(name)?;
        let key = locator.names().complete;

        let mut attributes = self
            .attributes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = attributes.get(&key) {
            return Ok(Arc::clone(existing));
        }

        let driver = self.validator.driver(&locator)?;
        tracing::debug!("Creating attribute {}", key);
        let attribute = Arc::new(TabularAttribute::new(
            locator,
            driver,
            self.config.attribute.clone(),
        ));
        attributes.insert(key, Arc::clone(&attribute));
        Ok(attribute)
    }

    /// Number of attributes created so far
    pub fn attribute_count(&self) -> usize {
        self.attributes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabattrError;

    fn factory() -> AttributeFactory {
        AttributeFactory::new(TabattrConfig::default()).unwrap()
    }

    #[test]
    fn test_attributes_are_shared_by_complete_name() {
        let factory = factory();
        let a = factory.attribute("pds:/data/file.csv::[\"x\"]").unwrap();
        let b = factory
            .attribute("pds://localhost/data/./file.csv::[\"x\"]")
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(factory.attribute_count(), 1);
    }

    #[test]
    fn test_invalid_name_creates_nothing() {
        let factory = factory();
        assert!(matches!(
            factory.attribute("pds:/data/file.unknownext::"),
            Err(TabattrError::InvalidName { .. })
        ));
        assert_eq!(factory.attribute_count(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = TabattrConfig::default();
        config.attribute.polling_period_ms = 0;
        assert!(matches!(
            AttributeFactory::new(config),
            Err(TabattrError::Config(_))
        ));
    }

    #[test]
    fn test_write_is_rejected() {
        let factory = factory();
        let attribute = factory.attribute("pds:/data/file.csv::").unwrap();
        let value = crate::value::TypedValue::boolean(crate::value::Shaped::Scalar(true));
        assert!(!attribute.is_writable());
        assert!(matches!(
            attribute.write(&value),
            Err(TabattrError::ReadOnlyAttribute(_))
        ));
    }

    #[test]
    fn test_flags_come_from_config() {
        let mut config = TabattrConfig::default();
        config.attribute.use_events = true;
        config.attribute.polling_enabled = false;
        let factory = AttributeFactory::new(config).unwrap();
        let attribute = factory.attribute("pds:/data/file.csv::").unwrap();
        assert!(attribute.is_using_events());
        assert!(!attribute.is_polling_enabled());
        assert_eq!(attribute.polling_period().as_millis(), 3000);
    }
}
