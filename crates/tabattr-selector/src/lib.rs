//! tabattr-selector - Selector grammar for tabular attributes
//!
//! The selector is the part of an attribute name that follows `::`. It is a
//! literal expression naming which sheet, columns and rows to extract, plus
//! an optional trailing mapping of loader options:
//!
//! - `""` selects everything with default options
//! - `["column1","column2"]` selects two columns
//! - `"Sheet",["column1"],[0,7]` selects a sheet, one column and rows 0..7
//! - `{"skiprows": 2}` passes options only
//!
//! # Grammar
//!
//! Only literals are accepted: strings, integers, floats, booleans, lists,
//! tuples and mappings. Nothing is ever evaluated.
//!
//! # Examples
//!
//! ```
//! use tabattr_selector::{parse_selector, ColumnKey, DELIMITED_LAYOUT};
//!
//! let request = parse_selector(r#"["x","y"],[0,3]"#, DELIMITED_LAYOUT).unwrap();
//! assert_eq!(
//!     request.columns,
//!     Some(vec![ColumnKey::label("x"), ColumnKey::label("y")])
//! );
//! ```

pub mod literal;
pub mod parser;
pub mod request;

pub use literal::*;
pub use parser::*;
pub use request::*;
