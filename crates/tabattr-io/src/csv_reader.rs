//! Delimited-text driver with type inference

use crate::options::{CsvSettings, LoadOptions};
use crate::reader::{ensure_exists, FormatDriver, IoError, IoResult};
use crate::table::{Cell, DataColumn, Table};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tabattr_selector::{SelectionRequest, Slot, DELIMITED_LAYOUT};

/// Driver for `.csv` files
#[derive(Debug, Clone, Default)]
pub struct DelimitedTextDriver {
    settings: CsvSettings,
}

impl DelimitedTextDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver with non-default settings
    pub fn with_settings(settings: CsvSettings) -> Self {
        Self { settings }
    }

    fn read_records(path: &Path, options: &LoadOptions) -> IoResult<Vec<Vec<String>>> {
        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .comment(options.comment)
            .has_headers(false)
            .flexible(true)
            .from_reader(BufReader::new(file));

        reader
            .records()
            .map(|result| {
                let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
                Ok(record.iter().map(|s| s.to_string()).collect())
            })
            .collect()
    }
}

impl FormatDriver for DelimitedTextDriver {
    fn format_name(&self) -> &'static str {
        "CSV"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".csv"]
    }

    fn layout(&self) -> &'static [Slot] {
        DELIMITED_LAYOUT
    }

    fn load_options(&self, request: &SelectionRequest) -> IoResult<LoadOptions> {
        LoadOptions::for_delimited(&request.options, &self.settings)
    }

    fn load(&self, path: &Path, options: &LoadOptions) -> IoResult<Table> {
        ensure_exists(path)?;
        let records = Self::read_records(path, options)?;
        let infer_rows = self.settings.infer_rows;
        options.assemble(
            records,
            String::new(),
            |s| s.trim().to_string(),
            |values| parse_column(&values, infer_type(&values, infer_rows)),
        )
    }
}

/// Inferred kind of a text column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextKind {
    Int,
    Float,
    Bool,
    Str,
}

fn is_bool(s: &str) -> bool {
    s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}

/// Infer column type from up to `sample` non-empty values (0 means all)
fn infer_type(values: &[String], sample: usize) -> TextKind {
    let limit = if sample == 0 { usize::MAX } else { sample };
    let non_empty: Vec<&str> = values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(limit)
        .collect();
    if non_empty.is_empty() {
        return TextKind::Str;
    }

    // Try parsing as integers
    if non_empty.iter().all(|s| s.parse::<i64>().is_ok()) {
        return TextKind::Int;
    }

    // Try parsing as floats
    if non_empty.iter().all(|s| s.parse::<f64>().is_ok()) {
        return TextKind::Float;
    }

    if non_empty.iter().all(|s| is_bool(s)) {
        return TextKind::Bool;
    }

    TextKind::Str
}

/// Parse column values into a DataColumn
///
/// Values outside the sampled rows that do not fit the inferred kind
/// demote the whole column to strings.
fn parse_column(values: &[String], kind: TextKind) -> DataColumn {
    let has_blank = values.iter().any(|s| s.trim().is_empty());
    let parsed = match kind {
        TextKind::Int if !has_blank => values
            .iter()
            .map(|s| s.trim().parse::<i64>().ok())
            .collect::<Option<Vec<_>>>()
            .map(DataColumn::Int64),
        TextKind::Int | TextKind::Float => values
            .iter()
            .map(|s| match s.trim() {
                "" => Some(f64::NAN),
                text => text.parse::<f64>().ok(),
            })
            .collect::<Option<Vec<_>>>()
            .map(DataColumn::Float64),
        TextKind::Bool if !has_blank => values
            .iter()
            .map(|s| is_bool(s.trim()).then(|| s.trim().eq_ignore_ascii_case("true")))
            .collect::<Option<Vec<_>>>()
            .map(DataColumn::Bool),
        TextKind::Bool => values
            .iter()
            .map(|s| match s.trim() {
                "" => Some(Cell::Empty),
                text => is_bool(text).then(|| Cell::Bool(text.eq_ignore_ascii_case("true"))),
            })
            .collect::<Option<Vec<_>>>()
            .map(DataColumn::Object),
        TextKind::Str => None,
    };

    parsed.unwrap_or_else(|| {
        if kind != TextKind::Str {
            tracing::debug!("Column does not fit inferred {:?}, reading as text", kind);
        }
        DataColumn::String(values.to_vec())
    })
}
