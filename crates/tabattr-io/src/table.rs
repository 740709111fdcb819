//! In-memory columnar tables

use crate::reader::{IoError, IoResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use tabattr_selector::ColumnKey;

/// A single cell of a mixed-kind column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Integer value of an int cell or an integral float cell
    fn integral(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(x) if x.fract() == 0.0 && x.abs() < 9.0e15 => Some(*x as i64),
            _ => None,
        }
    }

    fn number(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(x) => Some(*x),
            Cell::Empty => Some(f64::NAN),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{}", format_float(*x)),
            Cell::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Text form of a float; integral values keep a trailing `.0`
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        let text = if x > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{:.1}", x)
    } else {
        x.to_string()
    }
}

/// Kind of a column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Bool,
    Int,
    Float,
    Str,
    /// Mixed cells that share no common kind
    Object,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Int | ColumnKind::Float)
    }
}

/// A column of data
#[derive(Debug, Clone, PartialEq)]
pub enum DataColumn {
    Bool(Vec<bool>),
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    String(Vec<String>),
    Object(Vec<Cell>),
}

impl DataColumn {
    /// Build a column from loose cells, picking the narrowest kind
    ///
    /// Integral numbers become integers unless a blank forces float NaN.
    /// Booleans and strings only stay homogeneous without blanks, except
    /// strings where a blank reads as the empty string.
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        let filled: Vec<&Cell> = cells.iter().filter(|c| !c.is_empty()).collect();
        let has_blank = filled.len() < cells.len();

        if filled.is_empty() {
            return DataColumn::String(vec![String::new(); cells.len()]);
        }

        if !has_blank && filled.iter().all(|c| c.integral().is_some()) {
            return DataColumn::Int64(cells.iter().filter_map(Cell::integral).collect());
        }

        if filled.iter().all(|c| matches!(c, Cell::Int(_) | Cell::Float(_))) {
            return DataColumn::Float64(cells.iter().filter_map(Cell::number).collect());
        }

        if !has_blank && filled.iter().all(|c| matches!(c, Cell::Bool(_))) {
            return DataColumn::Bool(
                cells
                    .iter()
                    .map(|c| matches!(c, Cell::Bool(true)))
                    .collect(),
            );
        }

        if filled.iter().all(|c| matches!(c, Cell::Str(_))) {
            return DataColumn::String(cells.iter().map(|c| c.to_string()).collect());
        }

        DataColumn::Object(cells)
    }

    /// Get the column kind
    pub fn kind(&self) -> ColumnKind {
        match self {
            DataColumn::Bool(_) => ColumnKind::Bool,
            DataColumn::Int64(_) => ColumnKind::Int,
            DataColumn::Float64(_) => ColumnKind::Float,
            DataColumn::String(_) => ColumnKind::Str,
            DataColumn::Object(_) => ColumnKind::Object,
        }
    }

    /// Get the number of elements
    pub fn len(&self) -> usize {
        match self {
            DataColumn::Bool(v) => v.len(),
            DataColumn::Int64(v) => v.len(),
            DataColumn::Float64(v) => v.len(),
            DataColumn::String(v) => v.len(),
            DataColumn::Object(v) => v.len(),
        }
    }

    /// Check if the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get one value as a cell
    pub fn cell(&self, index: usize) -> Option<Cell> {
        match self {
            DataColumn::Bool(v) => v.get(index).map(|&b| Cell::Bool(b)),
            DataColumn::Int64(v) => v.get(index).map(|&i| Cell::Int(i)),
            DataColumn::Float64(v) => v.get(index).map(|&x| Cell::Float(x)),
            DataColumn::String(v) => v.get(index).map(|s| Cell::Str(s.clone())),
            DataColumn::Object(v) => v.get(index).cloned(),
        }
    }

    /// Every value rendered as text
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            DataColumn::String(v) => v.clone(),
            DataColumn::Bool(v) => v.iter().map(|b| b.to_string()).collect(),
            DataColumn::Int64(v) => v.iter().map(|i| i.to_string()).collect(),
            DataColumn::Float64(v) => v.iter().map(|&x| format_float(x)).collect(),
            DataColumn::Object(v) => v.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Convert to f64 (for numeric types)
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            DataColumn::Float64(v) => Some(v.clone()),
            DataColumn::Int64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            _ => None,
        }
    }

    /// Copy of a contiguous row range
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        match self {
            DataColumn::Bool(v) => DataColumn::Bool(v[start..end].to_vec()),
            DataColumn::Int64(v) => DataColumn::Int64(v[start..end].to_vec()),
            DataColumn::Float64(v) => DataColumn::Float64(v[start..end].to_vec()),
            DataColumn::String(v) => DataColumn::String(v[start..end].to_vec()),
            DataColumn::Object(v) => DataColumn::Object(v[start..end].to_vec()),
        }
    }
}

/// Make duplicate labels unique: `a, a, a` becomes `a, a.1, a.2`
pub fn dedupe_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    labels
        .into_iter()
        .map(|label| {
            if seen.insert(label.clone()) {
                return label;
            }
            let mut n = 1;
            loop {
                let candidate = format!("{}.{}", label, n);
                if seen.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

/// A rectangular table of named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, DataColumn)>,
    num_rows: usize,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns of equal length
    pub fn from_columns(columns: Vec<(String, DataColumn)>) -> IoResult<Self> {
        let mut table = Self::new();
        for (name, data) in columns {
            table.add_column(name, data)?;
        }
        Ok(table)
    }

    /// Append a column
    pub fn add_column(&mut self, name: impl Into<String>, data: DataColumn) -> IoResult<()> {
        let name = name.into();
        if self.columns.is_empty() {
            self.num_rows = data.len();
        } else if data.len() != self.num_rows {
            return Err(IoError::InvalidFormat(format!(
                "column '{}' has {} rows, expected {}",
                name,
                data.len(),
                self.num_rows
            )));
        }
        self.columns.push((name, data));
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Get column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&DataColumn> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data)
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| n == name)
    }

    /// Iterate over (name, column) pairs
    pub fn columns(&self) -> impl Iterator<Item = (&str, &DataColumn)> {
        self.columns.iter().map(|(name, data)| (name.as_str(), data))
    }

    /// Kind of every column, in order
    pub fn kinds(&self) -> Vec<ColumnKind> {
        self.columns.iter().map(|(_, data)| data.kind()).collect()
    }

    /// Resolve a column key to a position
    ///
    /// Negative indices count from the last column.
    pub fn resolve_column(&self, key: &ColumnKey) -> IoResult<usize> {
        let found = match key {
            ColumnKey::Label(name) => self.column_index(name),
            ColumnKey::Index(i) => {
                let len = self.columns.len() as i64;
                let i = if *i < 0 { *i + len } else { *i };
                (0..len).contains(&i).then_some(i as usize)
            }
        };
        found.ok_or_else(|| IoError::ColumnNotFound(key.to_string()))
    }

    /// New table with exactly the given columns, in the given order
    pub fn project(&self, keys: &[ColumnKey]) -> IoResult<Table> {
        let mut projected = Table::new();
        projected.num_rows = self.num_rows;
        for key in keys {
            let (name, data) = &self.columns[self.resolve_column(key)?];
            projected.columns.push((name.clone(), data.clone()));
        }
        Ok(projected)
    }

    /// New table with the rows in `range`, clamped to the table
    pub fn slice_rows(&self, range: Range<usize>) -> Table {
        let end = range.end.min(self.num_rows);
        let start = range.start.min(end);
        Table {
            columns: self
                .columns
                .iter()
                .map(|(name, data)| (name.clone(), data.slice(start..end)))
                .collect(),
            num_rows: end - start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("x".to_string(), DataColumn::Int64(vec![1, 2, 3])),
            ("y".to_string(), DataColumn::Float64(vec![0.5, 1.5, 2.5])),
            (
                "name".to_string(),
                DataColumn::String(vec!["a".into(), "b".into(), "c".into()]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_column_lookup() {
        let table = sample();
        assert_eq!(table.column_index("x"), Some(0));
        assert_eq!(table.column_index("y"), Some(1));
        assert_eq!(table.column_index("z"), None);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.column_names(), vec!["x", "y", "name"]);
    }

    #[test]
    fn test_add_column_length_mismatch() {
        let mut table = sample();
        let err = table
            .add_column("short", DataColumn::Bool(vec![true]))
            .unwrap_err();
        assert!(matches!(err, IoError::InvalidFormat(_)));
    }

    #[test]
    fn test_project_by_label_and_index() {
        let table = sample();
        let projected = table
            .project(&[ColumnKey::label("name"), ColumnKey::Index(0)])
            .unwrap();
        assert_eq!(projected.column_names(), vec!["name", "x"]);
        assert_eq!(projected.num_rows(), 3);

        let last = table.project(&[ColumnKey::Index(-1)]).unwrap();
        assert_eq!(last.column_names(), vec!["name"]);
    }

    #[test]
    fn test_project_missing_column() {
        let table = sample();
        assert!(matches!(
            table.project(&[ColumnKey::label("missing")]),
            Err(IoError::ColumnNotFound(_))
        ));
        assert!(matches!(
            table.project(&[ColumnKey::Index(3)]),
            Err(IoError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_slice_rows_clamps() {
        let table = sample();
        let sliced = table.slice_rows(1..10);
        assert_eq!(sliced.num_rows(), 2);
        assert_eq!(sliced.column("x"), Some(&DataColumn::Int64(vec![2, 3])));
        assert_eq!(table.slice_rows(5..9).num_rows(), 0);
    }

    #[test]
    fn test_from_cells_inference() {
        assert_eq!(
            DataColumn::from_cells(vec![Cell::Float(1.0), Cell::Int(2)]),
            DataColumn::Int64(vec![1, 2])
        );
        assert_eq!(
            DataColumn::from_cells(vec![Cell::Float(1.5), Cell::Int(2)]),
            DataColumn::Float64(vec![1.5, 2.0])
        );
        assert_eq!(
            DataColumn::from_cells(vec![Cell::Bool(true), Cell::Bool(false)]),
            DataColumn::Bool(vec![true, false])
        );
        assert_eq!(
            DataColumn::from_cells(vec![Cell::Str("a".into()), Cell::Empty]),
            DataColumn::String(vec!["a".into(), String::new()])
        );
        assert_eq!(
            DataColumn::from_cells(vec![Cell::Int(1), Cell::Str("a".into())]).kind(),
            ColumnKind::Object
        );

        match DataColumn::from_cells(vec![Cell::Int(1), Cell::Empty]) {
            DataColumn::Float64(v) => {
                assert_eq!(v[0], 1.0);
                assert!(v[1].is_nan());
            }
            other => panic!("Expected float column, got {:?}", other),
        }
    }

    #[test]
    fn test_dedupe_labels() {
        let labels = vec!["a".to_string(), "b".to_string(), "a".to_string(), "a".to_string()];
        assert_eq!(dedupe_labels(labels), vec!["a", "b", "a.1", "a.2"]);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(Cell::Float(1.0).to_string(), "1.0");
        assert_eq!(Cell::Float(2.25).to_string(), "2.25");
        assert_eq!(Cell::Int(7).to_string(), "7");
        assert_eq!(Cell::Bool(true).to_string(), "true");
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(format_float(f64::NAN), "nan");
    }
}
