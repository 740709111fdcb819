//! Shared fixtures for attribute tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tabattr_core::{AttributeFactory, NamingConfig, TabattrConfig};
use tempfile::TempDir;

/// A temporary directory of fixture files plus a factory to read them
pub struct Fixture {
    pub dir: TempDir,
    pub factory: AttributeFactory,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(TabattrConfig::default())
    }

    pub fn with_config(config: TabattrConfig) -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            factory: AttributeFactory::new(config).expect("factory"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn csv(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("write csv");
        path
    }

    /// Sheets are `(name, rows)`; the first must be `Sheet1`
    pub fn xlsx(&self, name: &str, sheets: &[(&str, &[&[&str]])]) -> PathBuf {
        let path = self.path(name);
        write_xlsx(&path, sheets);
        path
    }
}

/// Attribute name for a file and selector
pub fn attr_name(scheme: &str, path: &Path, selector: &str) -> String {
    format!("{}:{}::{}", scheme, path.display(), selector)
}

/// Factory that keeps symlinked temp paths as written
pub fn lexical_config() -> TabattrConfig {
    TabattrConfig {
        naming: NamingConfig {
            resolve_symlinks: false,
            ..NamingConfig::default()
        },
        ..TabattrConfig::default()
    }
}

/// Write a workbook; cells that parse as numbers are stored as numbers
pub fn write_xlsx(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut book = umya_spreadsheet::new_file();
    for (index, (name, rows)) in sheets.iter().enumerate() {
        let sheet = if index == 0 {
            assert_eq!(*name, "Sheet1", "first fixture sheet must be Sheet1");
            book.get_sheet_by_name_mut("Sheet1").expect("default sheet")
        } else {
            book.new_sheet(*name).expect("new sheet")
        };
        for (r, row) in rows.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                let cell = sheet.get_cell_mut(((c + 1) as u32, (r + 1) as u32));
                match text.parse::<f64>() {
                    Ok(number) => {
                        cell.set_value_number(number);
                    }
                    Err(_) => {
                        cell.set_value(*text);
                    }
                }
            }
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).expect("write xlsx");
}
