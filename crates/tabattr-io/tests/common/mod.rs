//! Test fixture helpers

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// A cell written into an `.xlsx` fixture
#[derive(Debug, Clone, Copy)]
pub enum XCell {
    Num(f64),
    Text(&'static str),
    Bool(bool),
    Blank,
}

/// Write a CSV fixture into `dir`
pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content)
        .unwrap_or_else(|_| panic!("Failed to write fixture: {}", name));
    path
}

/// Write an `.xlsx` fixture; the first sheet is always named `Sheet1`
pub fn write_xlsx(path: &Path, sheets: &[(&str, Vec<Vec<XCell>>)]) {
    let mut book = umya_spreadsheet::new_file();
    for (index, (name, rows)) in sheets.iter().enumerate() {
        let sheet = if index == 0 {
            assert_eq!(*name, "Sheet1", "first fixture sheet must be Sheet1");
            book.get_sheet_by_name_mut("Sheet1").expect("default sheet")
        } else {
            book.new_sheet(*name).expect("new sheet")
        };
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let coordinate = ((c + 1) as u32, (r + 1) as u32);
                match *cell {
                    XCell::Num(n) => {
                        sheet.get_cell_mut(coordinate).set_value_number(n);
                    }
                    XCell::Text(s) => {
                        sheet.get_cell_mut(coordinate).set_value(s);
                    }
                    XCell::Bool(b) => {
                        sheet.get_cell_mut(coordinate).set_value_bool(b);
                    }
                    XCell::Blank => {}
                }
            }
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).expect("write xlsx");
}

/// Two-sheet workbook used by the spreadsheet tests
///
/// `Sheet1`: int1, int2, text; `Data`: a, b with float and bool columns.
pub fn sample_workbook(dir: &Path) -> PathBuf {
    use XCell::*;
    let path = dir.join("file.xlsx");
    write_xlsx(
        &path,
        &[
            (
                "Sheet1",
                vec![
                    vec![Text("int1"), Text("int2"), Text("text")],
                    vec![Num(1.0), Num(4.0), Text("a")],
                    vec![Num(2.0), Num(5.0), Text("b")],
                    vec![Num(3.0), Num(6.0), Text("c")],
                ],
            ),
            (
                "Data",
                vec![
                    vec![Text("a"), Text("b"), Text("flag")],
                    vec![Num(1.5), Num(1.0), Bool(true)],
                    vec![Num(2.5), Text("x"), Bool(false)],
                ],
            ),
        ],
    );
    path
}
