//! Column and row selection on loaded tables

use crate::reader::IoResult;
use crate::table::Table;
use tabattr_selector::SelectionRequest;

/// Reduce a table to the requested columns, then the requested rows
///
/// Columns are projected in the order given. Rows use slice semantics and
/// clamp to the table instead of failing.
pub fn select_table(table: Table, request: &SelectionRequest) -> IoResult<Table> {
    let table = match &request.columns {
        Some(keys) if !keys.is_empty() => table.project(keys)?,
        _ => table,
    };

    Ok(match &request.rows {
        Some(rows) => table.slice_rows(rows.resolve(table.num_rows())),
        None => table,
    })
}
