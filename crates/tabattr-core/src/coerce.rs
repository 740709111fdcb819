//! Table to typed value conversion
//!
//! Shape follows the table's extent: one cell is a scalar, a single
//! column or a single row is a vector, anything else a row-major matrix.
//! The element type widens across columns (integers with floats become
//! floats); any other mix demotes every cell to text.

use crate::value::{DataFormat, Shaped, TypedValue};
use tabattr_io::{DataColumn, Table};

/// Shape of a table with `rows` rows and `columns` columns
pub fn data_format(rows: usize, columns: usize) -> DataFormat {
    match (rows, columns) {
        (1, 1) => DataFormat::Scalar,
        (_, 0) | (_, 1) | (1, _) => DataFormat::Vector,
        _ => DataFormat::Matrix,
    }
}

/// Convert a selected table into a typed value
pub fn coerce(table: &Table) -> TypedValue {
    let format = data_format(table.num_rows(), table.num_columns());

    if table.num_columns() > 0 {
        if let Some(columns) = collect(table, bools) {
            return TypedValue::boolean(arrange(columns, format));
        }
        if let Some(columns) = collect(table, integers) {
            return TypedValue::integer(arrange(columns, format));
        }
    }
    if let Some(columns) = collect(table, DataColumn::to_f64) {
        return TypedValue::float(arrange(columns, format));
    }

    tracing::debug!("Mixed column kinds {:?}, reading as text", table.kinds());
    let columns = table.columns().map(|(_, c)| c.to_strings()).collect();
    TypedValue::string(arrange(columns, format))
}

fn bools(column: &DataColumn) -> Option<Vec<bool>> {
    match column {
        DataColumn::Bool(v) => Some(v.clone()),
        _ => None,
    }
}

fn integers(column: &DataColumn) -> Option<Vec<i64>> {
    match column {
        DataColumn::Int64(v) => Some(v.clone()),
        _ => None,
    }
}

/// Extract every column, or nothing if any column does not fit
fn collect<T>(table: &Table, extract: impl Fn(&DataColumn) -> Option<Vec<T>>) -> Option<Vec<Vec<T>>> {
    table.columns().map(|(_, column)| extract(column)).collect()
}

/// Lay out column-major data in the requested shape
fn arrange<T: Clone>(columns: Vec<Vec<T>>, format: DataFormat) -> Shaped<T> {
    match format {
        DataFormat::Matrix => {
            let rows = columns.first().map(Vec::len).unwrap_or(0);
            Shaped::Matrix(
                (0..rows)
                    .map(|r| columns.iter().map(|column| column[r].clone()).collect())
                    .collect(),
            )
        }
        _ if columns.len() <= 1 => {
            let values = columns.into_iter().next().unwrap_or_default();
            match (format, values.as_slice()) {
                (DataFormat::Scalar, [single]) => Shaped::Scalar(single.clone()),
                _ => Shaped::Vector(values),
            }
        }
        // One row spread over several columns
        _ => Shaped::Vector(
            columns
                .into_iter()
                .filter_map(|column| column.into_iter().next())
                .collect(),
        ),
    }
}
