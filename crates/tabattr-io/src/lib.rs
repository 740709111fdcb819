//! tabattr-io - Table loading for tabular attributes
//!
//! This crate loads files into small owned columnar tables:
//!
//! - **CSV**: delimited text with per-column type inference
//! - **Spreadsheet**: `.xls` / `.xlsx` workbooks read with calamine
//!
//! # Design
//!
//! All drivers implement the `FormatDriver` trait. A `FormatRegistry`
//! maps scheme tokens to drivers and resolves the generic scheme by file
//! extension. Selection (column projection, then row slicing) is applied
//! to a freshly loaded table; nothing is cached between reads.

pub mod options;
pub mod reader;
pub mod registry;
pub mod select;
pub mod table;

#[cfg(feature = "csv")]
pub mod csv_reader;

#[cfg(feature = "spreadsheet")]
pub mod spreadsheet_reader;

pub use options::*;
pub use reader::*;
pub use registry::*;
pub use select::*;
pub use table::*;

#[cfg(feature = "csv")]
pub use csv_reader::DelimitedTextDriver;

#[cfg(feature = "spreadsheet")]
pub use spreadsheet_reader::SpreadsheetDriver;
