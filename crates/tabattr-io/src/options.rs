//! Loader options
//!
//! Options arrive as the trailing mapping of a selector and are forwarded
//! to the loader. Keys a driver does not understand are rejected rather
//! than ignored.

use crate::reader::{IoError, IoResult};
use crate::table::{dedupe_labels, DataColumn, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tabattr_selector::{ColumnKey, Literal, Options, SheetRef};

/// Defaults for delimited-text loading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    /// Field delimiter
    pub delimiter: char,
    /// Whether the first line holds column labels
    pub has_header: bool,
    /// Rows sampled for type inference, 0 means every row
    pub infer_rows: usize,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
            infer_rows: 100,
        }
    }
}

/// Resolved options for one load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Row holding the labels (after `skiprows`); `None` means no header
    pub header: Option<usize>,
    /// Leading rows to drop
    pub skiprows: usize,
    /// Maximum number of data rows
    pub nrows: Option<usize>,
    /// Columns to keep, in file order
    pub usecols: Option<Vec<ColumnKey>>,
    /// Labels replacing the header
    pub names: Option<Vec<String>>,
    pub delimiter: u8,
    pub quote: u8,
    pub comment: Option<u8>,
    /// Sheet to read from a workbook
    pub sheet: Option<SheetRef>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            header: Some(0),
            skiprows: 0,
            nrows: None,
            usecols: None,
            names: None,
            delimiter: b',',
            quote: b'"',
            comment: None,
            sheet: None,
        }
    }
}

impl LoadOptions {
    /// Options for delimited text, starting from configured defaults
    pub fn for_delimited(options: &Options, settings: &CsvSettings) -> IoResult<Self> {
        let mut resolved = Self {
            header: settings.has_header.then_some(0),
            delimiter: ascii_byte("delimiter", settings.delimiter)?,
            ..Self::default()
        };

        for (key, value) in options {
            if resolved.apply_common(key, value, false)? {
                continue;
            }
            match key.as_str() {
                "sep" | "delimiter" => resolved.delimiter = single_byte(key, value)?,
                "quotechar" => resolved.quote = single_byte(key, value)?,
                "comment" => resolved.comment = Some(single_byte(key, value)?),
                _ => return Err(IoError::UnsupportedOption(key.clone())),
            }
        }

        Ok(resolved)
    }

    /// Options for spreadsheets; a positional sheet overrides `sheet_name`
    pub fn for_spreadsheet(options: &Options, sheet: Option<&SheetRef>) -> IoResult<Self> {
        let mut resolved = Self::default();

        for (key, value) in options {
            if resolved.apply_common(key, value, true)? {
                continue;
            }
            match key.as_str() {
                "sheet_name" | "sheetname" => {
                    resolved.sheet = SheetRef::from_literal(value).map_err(|e| invalid(key, e))?
                }
                "parse_cols" => resolved.usecols = Some(parse_usecols(key, value, true)?),
                _ => return Err(IoError::UnsupportedOption(key.clone())),
            }
        }

        if let Some(sheet) = sheet {
            resolved.sheet = Some(sheet.clone());
        }

        Ok(resolved)
    }

    fn apply_common(&mut self, key: &str, value: &Literal, letters: bool) -> IoResult<bool> {
        match key {
            "header" => {
                self.header = match value {
                    Literal::Bool(false) => None,
                    _ => Some(non_negative(key, value)?),
                }
            }
            "skiprows" => self.skiprows = non_negative(key, value)?,
            "nrows" => self.nrows = Some(non_negative(key, value)?),
            "usecols" => self.usecols = Some(parse_usecols(key, value, letters)?),
            "names" => {
                let names = value
                    .as_sequence()
                    .and_then(|items| {
                        items
                            .iter()
                            .map(|item| item.as_str().map(str::to_string))
                            .collect::<Option<Vec<_>>>()
                    })
                    .ok_or_else(|| invalid(key, "expected a list of strings"))?;
                self.names = Some(names);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Build a table from raw rows according to these options
    ///
    /// `label` renders a header cell and `build` turns one column of raw
    /// values into a typed column.
    pub(crate) fn assemble<T: Clone>(
        &self,
        rows: Vec<Vec<T>>,
        blank: T,
        label: impl Fn(&T) -> String,
        build: impl Fn(Vec<T>) -> DataColumn,
    ) -> IoResult<Table> {
        let mut rows = rows.into_iter().skip(self.skiprows);

        let header: Option<Vec<String>> = match self.header {
            Some(line) => Some(
                rows.by_ref()
                    .nth(line)
                    .map(|row| row.iter().map(&label).collect())
                    .unwrap_or_default(),
            ),
            None => None,
        };

        let mut data: Vec<Vec<T>> = rows.collect();
        if let Some(limit) = self.nrows {
            data.truncate(limit);
        }

        let width = data
            .iter()
            .map(Vec::len)
            .chain(header.as_ref().map(Vec::len))
            .max()
            .unwrap_or(0);

        let labels = match (&self.names, header) {
            (Some(names), _) => {
                if names.len() != width {
                    return Err(invalid(
                        "names",
                        format!("{} names given for {} columns", names.len(), width),
                    ));
                }
                names.clone()
            }
            (None, Some(header)) => (0..width)
                .map(|i| match header.get(i) {
                    Some(text) if !text.is_empty() => text.clone(),
                    _ => format!("Unnamed: {}", i),
                })
                .collect(),
            (None, None) => (0..width).map(|i| i.to_string()).collect(),
        };
        let labels = dedupe_labels(labels);

        let selected: Vec<usize> = match &self.usecols {
            Some(keys) => {
                let mut indices = BTreeSet::new();
                for key in keys {
                    let index = match key {
                        ColumnKey::Label(name) => labels.iter().position(|l| l == name),
                        ColumnKey::Index(i) => usize::try_from(*i).ok().filter(|i| *i < width),
                    };
                    let index = index.ok_or_else(|| {
                        invalid("usecols", format!("column {} not found in file", key))
                    })?;
                    indices.insert(index);
                }
                indices.into_iter().collect()
            }
            None => (0..width).collect(),
        };

        let mut table = Table::new();
        for index in selected {
            let values: Vec<T> = data
                .iter()
                .map(|row| row.get(index).cloned().unwrap_or_else(|| blank.clone()))
                .collect();
            table.add_column(labels[index].clone(), build(values))?;
        }
        Ok(table)
    }
}

fn invalid(name: &str, message: impl ToString) -> IoError {
    IoError::InvalidOption {
        name: name.to_string(),
        message: message.to_string(),
    }
}

fn non_negative(name: &str, value: &Literal) -> IoResult<usize> {
    value
        .as_int()
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| invalid(name, format!("expected a non-negative integer, got {}", value)))
}

fn ascii_byte(name: &str, c: char) -> IoResult<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(invalid(name, format!("'{}' is not a single-byte character", c)))
    }
}

fn single_byte(name: &str, value: &Literal) -> IoResult<u8> {
    let text = value
        .as_str()
        .ok_or_else(|| invalid(name, "expected a one-character string"))?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => ascii_byte(name, c),
        _ => Err(invalid(name, format!("expected one character, got {:?}", text))),
    }
}

fn parse_usecols(name: &str, value: &Literal, letters: bool) -> IoResult<Vec<ColumnKey>> {
    match value {
        Literal::Str(range) if letters => parse_column_letters(range)
            .map(|indices| indices.into_iter().map(|i| ColumnKey::Index(i as i64)).collect())
            .ok_or_else(|| invalid(name, format!("invalid column range {:?}", range))),
        _ => ColumnKey::list_from_literal(value).map_err(|e| invalid(name, e)),
    }
}

/// Parse Excel-style column letters such as `"A:C,E"` into 0-based indices
pub fn parse_column_letters(range: &str) -> Option<Vec<usize>> {
    let mut indices = Vec::new();
    for part in range.split(',') {
        let part = part.trim();
        match part.split_once(':') {
            Some((first, last)) => {
                let first = column_to_index(first)?;
                let last = column_to_index(last)?;
                if last < first {
                    return None;
                }
                indices.extend(first..=last);
            }
            None => indices.push(column_to_index(part)?),
        }
    }
    Some(indices)
}

/// Convert column letters to a 0-based number (A=0, B=1, ..., Z=25, AA=26)
fn column_to_index(col: &str) -> Option<usize> {
    let col = col.trim();
    if col.is_empty() || !col.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut result: usize = 0;
    for c in col.to_ascii_uppercase().chars() {
        result = result.checked_mul(26)?.checked_add(c as usize - 'A' as usize + 1)?;
    }
    Some(result - 1)
}
