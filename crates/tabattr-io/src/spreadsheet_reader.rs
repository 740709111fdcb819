//! Spreadsheet driver using calamine

use crate::options::LoadOptions;
use crate::reader::{ensure_exists, FormatDriver, IoError, IoResult};
use crate::table::{format_float, Cell, DataColumn, Table};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tabattr_selector::{SelectionRequest, SheetRef, Slot, SPREADSHEET_LAYOUT};

/// Driver for `.xls` and `.xlsx` workbooks
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetDriver;

impl SpreadsheetDriver {
    pub fn new() -> Self {
        Self
    }

    /// Convert a calamine cell
    fn cell_from_data(data: &Data) -> Cell {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Str(s.clone()),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::Error(e) => Cell::Str(format!("#ERROR: {:?}", e)),
            Data::DateTime(dt) => Cell::Str(format!("{}", dt)),
            Data::DateTimeIso(s) => Cell::Str(s.clone()),
            Data::DurationIso(s) => Cell::Str(s.clone()),
        }
    }

    /// Header text for a cell
    fn label(cell: &Cell) -> String {
        match cell {
            Cell::Float(f) if f.fract() == 0.0 => format!("{:.0}", f),
            Cell::Float(f) => format_float(*f),
            other => other.to_string(),
        }
    }

    /// Pick the sheet to read; the first sheet by default
    fn sheet_name(sheet_names: &[String], sheet: Option<&SheetRef>) -> IoResult<String> {
        match sheet {
            Some(SheetRef::Name(name)) => sheet_names
                .iter()
                .find(|n| *n == name)
                .cloned()
                .ok_or_else(|| IoError::SheetNotFound(name.clone())),
            Some(SheetRef::Index(index)) => sheet_names
                .get(*index)
                .cloned()
                .ok_or_else(|| IoError::SheetNotFound(format!("#{}", index))),
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| IoError::InvalidFormat("workbook has no sheets".to_string())),
        }
    }
}

impl FormatDriver for SpreadsheetDriver {
    fn format_name(&self) -> &'static str {
        "Spreadsheet"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".xls", ".xlsx"]
    }

    fn layout(&self) -> &'static [Slot] {
        SPREADSHEET_LAYOUT
    }

    fn load_options(&self, request: &SelectionRequest) -> IoResult<LoadOptions> {
        LoadOptions::for_spreadsheet(&request.options, request.sheet.as_ref())
    }

    fn load(&self, path: &Path, options: &LoadOptions) -> IoResult<Table> {
        ensure_exists(path)?;

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| IoError::OpenFailed(format!("{}: {}", path.display(), e)))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let sheet = Self::sheet_name(&sheet_names, options.sheet.as_ref())?;
        tracing::debug!("Reading sheet '{}' from {}", sheet, path.display());

        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| IoError::InvalidFormat(format!("{}: {}", sheet, e)))?;

        // Ranges start at the first used cell; keep leading empty columns
        let leading = range.start().map(|(_, col)| col as usize).unwrap_or(0);
        let rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| {
                std::iter::repeat(Cell::Empty)
                    .take(leading)
                    .chain(row.iter().map(Self::cell_from_data))
                    .collect()
            })
            .collect();

        options.assemble(rows, Cell::Empty, Self::label, DataColumn::from_cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_from_data() {
        assert_eq!(SpreadsheetDriver::cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(
            SpreadsheetDriver::cell_from_data(&Data::String("hello".to_string())),
            Cell::Str("hello".to_string())
        );
        assert_eq!(SpreadsheetDriver::cell_from_data(&Data::Int(42)), Cell::Int(42));
        assert_eq!(
            SpreadsheetDriver::cell_from_data(&Data::Float(3.5)),
            Cell::Float(3.5)
        );
        assert_eq!(
            SpreadsheetDriver::cell_from_data(&Data::Bool(true)),
            Cell::Bool(true)
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(SpreadsheetDriver::label(&Cell::Float(2020.0)), "2020");
        assert_eq!(SpreadsheetDriver::label(&Cell::Str("x".into())), "x");
        assert_eq!(SpreadsheetDriver::label(&Cell::Empty), "");
    }

    #[test]
    fn test_sheet_name_selection() {
        let names = vec!["Sheet1".to_string(), "Data".to_string()];
        assert_eq!(SpreadsheetDriver::sheet_name(&names, None).unwrap(), "Sheet1");
        assert_eq!(
            SpreadsheetDriver::sheet_name(&names, Some(&SheetRef::Name("Data".into()))).unwrap(),
            "Data"
        );
        assert_eq!(
            SpreadsheetDriver::sheet_name(&names, Some(&SheetRef::Index(1))).unwrap(),
            "Data"
        );
        assert!(matches!(
            SpreadsheetDriver::sheet_name(&names, Some(&SheetRef::Name("Nope".into()))),
            Err(IoError::SheetNotFound(_))
        ));
        assert!(matches!(
            SpreadsheetDriver::sheet_name(&[], None),
            Err(IoError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_supports_extensions() {
        let driver = SpreadsheetDriver::new();
        assert!(driver.supports(".xls"));
        assert!(driver.supports(".xlsx"));
        assert!(!driver.supports(".XLSX"));
        assert!(!driver.supports(".csv"));
    }
}
