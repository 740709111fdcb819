//! Selection requests built from parsed selectors
//!
//! A parsed literal is split into positional arguments and a trailing
//! options mapping. The meaning of each position depends on the file
//! format, described by a layout of [`Slot`]s.

use crate::literal::Literal;
use crate::parser::{parse_literal, SelectorError, SelectorResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

/// Meaning of a positional selector argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Sheet,
    Columns,
    Rows,
}

/// Positional layout for delimited text: columns, rows
pub const DELIMITED_LAYOUT: &[Slot] = &[Slot::Columns, Slot::Rows];

/// Positional layout for spreadsheets: sheet, columns, rows
pub const SPREADSHEET_LAYOUT: &[Slot] = &[Slot::Sheet, Slot::Columns, Slot::Rows];

/// Loader options keyed by option name
pub type Options = BTreeMap<String, Literal>;

/// A selector split into positional arguments and options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorArgs {
    pub positional: Vec<Literal>,
    pub options: Options,
}

impl SelectorArgs {
    /// Split a top-level literal
    ///
    /// A mapping becomes the options, a tuple is spread into positions
    /// (with a trailing mapping taken as options), anything else is the
    /// single argument at position 0.
    pub fn from_literal(literal: Literal) -> SelectorResult<Self> {
        match literal {
            Literal::Dict(entries) => Ok(Self {
                positional: Vec::new(),
                options: options_from_entries(entries)?,
            }),
            Literal::Tuple(mut items) => {
                let options = match items.pop() {
                    Some(Literal::Dict(entries)) => options_from_entries(entries)?,
                    Some(other) => {
                        items.push(other);
                        Options::new()
                    }
                    None => Options::new(),
                };
                Ok(Self {
                    positional: items,
                    options,
                })
            }
            other => Ok(Self {
                positional: vec![other],
                options: Options::new(),
            }),
        }
    }
}

fn options_from_entries(entries: Vec<(Literal, Literal)>) -> SelectorResult<Options> {
    let mut options = Options::new();
    for (key, value) in entries {
        match key {
            Literal::Str(name) => {
                options.insert(name, value);
            }
            other => {
                return Err(SelectorError::Shape(format!(
                    "option keys must be strings, got {}",
                    other.type_name()
                )))
            }
        }
    }
    Ok(options)
}

/// A column identifier: a label, or a position in the loaded table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKey {
    Label(String),
    Index(i64),
}

impl ColumnKey {
    pub fn label(name: impl Into<String>) -> Self {
        ColumnKey::Label(name.into())
    }

    fn from_literal(literal: &Literal) -> SelectorResult<Self> {
        match literal {
            Literal::Str(s) => Ok(ColumnKey::Label(s.clone())),
            Literal::Int(i) => Ok(ColumnKey::Index(*i)),
            other => Err(SelectorError::Shape(format!(
                "column must be a name or an index, got {}",
                other.type_name()
            ))),
        }
    }

    /// Parse a list of column keys, as used by `usecols`
    pub fn list_from_literal(literal: &Literal) -> SelectorResult<Vec<Self>> {
        match literal {
            Literal::Str(_) | Literal::Int(_) => Ok(vec![Self::from_literal(literal)?]),
            Literal::List(items) | Literal::Tuple(items) => {
                items.iter().map(Self::from_literal).collect()
            }
            other => Err(SelectorError::Shape(format!(
                "columns must be a list, got {}",
                other.type_name()
            ))),
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Label(name) => write!(f, "{:?}", name),
            ColumnKey::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A row selection with slice semantics
///
/// Negative indices count from the end. Bounds are clamped to the table,
/// so an out-of-range selection shrinks instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowSpec {
    /// A single row, the range `[row, row + 1)`
    ///
    /// Both ends are resolved independently, so `-1` selects nothing.
    Single(i64),

    /// Half-open range `[start, end)`
    Range { start: i64, end: i64 },
}

impl RowSpec {
    fn from_literal(literal: &Literal) -> SelectorResult<Option<Self>> {
        let items = match literal {
            Literal::Int(i) => return Ok(Some(RowSpec::Single(*i))),
            Literal::List(items) | Literal::Tuple(items) => items,
            other => {
                return Err(SelectorError::Shape(format!(
                    "rows must be a list of indices, got {}",
                    other.type_name()
                )))
            }
        };

        let indices = items
            .iter()
            .map(|item| {
                item.as_int().ok_or_else(|| {
                    SelectorError::Shape(format!(
                        "row indices must be integers, got {}",
                        item.type_name()
                    ))
                })
            })
            .collect::<SelectorResult<Vec<i64>>>()?;

        match indices.as_slice() {
            [] => Ok(None),
            [row] => Ok(Some(RowSpec::Single(*row))),
            [start, end] => Ok(Some(RowSpec::Range {
                start: *start,
                end: *end,
            })),
            _ => Err(SelectorError::Shape(format!(
                "rows takes one index or a [start, end] pair, got {} values",
                indices.len()
            ))),
        }
    }

    /// Resolve against a table with `len` rows
    pub fn resolve(&self, len: usize) -> Range<usize> {
        match *self {
            RowSpec::Single(row) => RowSpec::Range {
                start: row,
                end: row.saturating_add(1),
            }
            .resolve(len),
            RowSpec::Range { start, end } => {
                let start = clamp_index(start, len);
                let end = clamp_index(end, len).max(start);
                start..end
            }
        }
    }
}

fn clamp_index(index: i64, len: usize) -> usize {
    let len = len as i64;
    let index = if index < 0 { index + len } else { index };
    index.clamp(0, len) as usize
}

/// Sheet to load from a workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetRef {
    Name(String),
    Index(usize),
}

impl SheetRef {
    /// Interpret a sheet literal; an empty name means the default sheet
    pub fn from_literal(literal: &Literal) -> SelectorResult<Option<Self>> {
        match literal {
            Literal::Str(name) if name.is_empty() => Ok(None),
            Literal::Str(name) => Ok(Some(SheetRef::Name(name.clone()))),
            Literal::Int(i) if *i >= 0 => Ok(Some(SheetRef::Index(*i as usize))),
            other => Err(SelectorError::Shape(format!(
                "sheet must be a name or a non-negative index, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRef::Name(name) => write!(f, "{}", name),
            SheetRef::Index(i) => write!(f, "#{}", i),
        }
    }
}

/// What to extract from a file, and how to load it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionRequest {
    /// Sheet to load (spreadsheets only)
    pub sheet: Option<SheetRef>,

    /// Columns to project, in order; `None` keeps all columns
    pub columns: Option<Vec<ColumnKey>>,

    /// Rows to keep; `None` keeps all rows
    pub rows: Option<RowSpec>,

    /// Options forwarded to the loader
    pub options: Options,
}

impl SelectionRequest {
    /// A request that selects everything with default options
    pub fn all() -> Self {
        Self::default()
    }

    /// Assign positional arguments according to a driver layout
    pub fn from_args(args: SelectorArgs, layout: &[Slot]) -> SelectorResult<Self> {
        if args.positional.len() > layout.len() {
            return Err(SelectorError::Shape(format!(
                "at most {} positional arguments are accepted, got {}",
                layout.len(),
                args.positional.len()
            )));
        }

        let mut request = Self {
            options: args.options,
            ..Self::default()
        };

        for (slot, arg) in layout.iter().zip(args.positional.iter()) {
            match slot {
                Slot::Sheet => {
                    request.sheet = SheetRef::from_literal(arg)?;
                    if request.sheet.is_none() {
                        tracing::debug!("Empty sheet token, using the first sheet");
                    }
                }
                Slot::Columns => {
                    let columns = ColumnKey::list_from_literal(arg)?;
                    request.columns = if columns.is_empty() {
                        None
                    } else {
                        Some(columns)
                    };
                }
                Slot::Rows => request.rows = RowSpec::from_literal(arg)?,
            }
        }

        Ok(request)
    }

    /// Whether the request keeps the whole table
    pub fn selects_everything(&self) -> bool {
        self.columns.is_none() && self.rows.is_none()
    }
}

/// Parse selector text into a request for the given layout
///
/// Empty text selects everything with default options.
pub fn parse_selector(text: &str, layout: &[Slot]) -> SelectorResult<SelectionRequest> {
    if text.trim().is_empty() {
        return Ok(SelectionRequest::all());
    }
    let literal = parse_literal(text)?;
    SelectionRequest::from_args(SelectorArgs::from_literal(literal)?, layout)
}
