//! tabattr-core - Spreadsheet and CSV contents as read-only attributes
//!
//! A name such as `pds:/data/run.xlsx::"Sheet1",["temp"],[0,10]` addresses
//! a selection inside a file. This crate:
//!
//! - validates and canonicalizes names (`validator`, `path`)
//! - reads the selection through a `tabattr_io` driver
//! - converts the resulting table into a shaped, typed value (`coerce`)
//! - wraps all of it in cached, read-only attributes (`attribute`,
//!   `factory`)
//!
//! # Example
//!
//! ```no_run
//! use tabattr_core::{AttributeFactory, TabattrConfig};
//!
//! let factory = AttributeFactory::new(TabattrConfig::default())?;
//! let attribute = factory.attribute("pds:/data/run.csv::[\"temp\"]")?;
//! let value = attribute.read(true)?;
//! println!("{}", value.rvalue);
//! # Ok::<(), tabattr_core::TabattrError>(())
//! ```

pub mod attribute;
pub mod coerce;
pub mod config;
pub mod error;
pub mod factory;
pub mod path;
pub mod validator;
pub mod value;

pub use attribute::*;
pub use coerce::{coerce, data_format};
pub use config::*;
pub use error::*;
pub use factory::AttributeFactory;
pub use validator::*;
pub use value::*;

pub use tabattr_io::{FormatRegistry, Table};
pub use tabattr_selector::{parse_selector, SelectionRequest};
