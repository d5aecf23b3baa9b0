//! Results workbook writer.

use std::path::Path;

use cnpj_core::results::{self, COLUMNS, Row};
use serde_json::Value;
use tracing::info;
use umya_spreadsheet::{Cell, Worksheet};

use crate::StoreError;

const SHEET_NAME: &str = "Sheet1";

/// Write `rows` to a fresh workbook at `path`, replacing any existing file.
///
/// Row 1 is the header from [`COLUMNS`]; data starts on row 2. Every row is
/// checked before anything touches the disk, so a shape error leaves an
/// existing file intact.
pub fn write_rows(path: &Path, rows: &[Row]) -> Result<(), StoreError> {
    let mut projected = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        match results::project(row) {
            Some(values) => projected.push(values),
            None => {
                return Err(StoreError::MissingColumns {
                    row: idx,
                    missing: results::missing_columns(row),
                });
            }
        }
    }

    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut(SHEET_NAME)
        .ok_or_else(|| StoreError::spreadsheet(path, "new workbook has no default sheet"))?;

    write_header(sheet);
    for (row_idx, values) in projected.iter().enumerate() {
        let row_num = row_idx as u32 + 2;
        for (col_idx, value) in values.iter().enumerate() {
            set_cell(sheet.get_cell_mut((col_idx as u32 + 1, row_num)), value);
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, path).map_err(|e| StoreError::spreadsheet(path, e))?;
    info!(path = %path.display(), rows = projected.len(), "wrote results table");
    Ok(())
}

fn write_header(sheet: &mut Worksheet) {
    for (col_idx, name) in COLUMNS.iter().enumerate() {
        sheet
            .get_cell_mut((col_idx as u32 + 1, 1))
            .set_value_string(*name);
    }
}

fn set_cell(cell: &mut Cell, value: &Value) {
    match value {
        Value::Bool(b) => {
            cell.set_value_bool(*b);
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                cell.set_value_number(f);
            }
            None => {
                cell.set_value_string(n.to_string());
            }
        },
        Value::String(s) => {
            cell.set_value_string(s.as_str());
        }
        Value::Null => {}
        other => {
            cell.set_value_string(other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(cnpj: &str, name: &str) -> Row {
        let mut row = Row::new();
        row.insert("cnpj".into(), json!(cnpj));
        row.insert("razao_social".into(), json!(name));
        row.insert("opcao_pelo_simples".into(), json!(true));
        row.insert("opcao_pelo_mei".into(), json!(false));
        row
    }

    fn read_text(path: &Path, col: u32, row: u32) -> String {
        let book = umya_spreadsheet::reader::xlsx::read(path).unwrap();
        let sheet = book.get_sheet_by_name(SHEET_NAME).unwrap();
        sheet
            .get_cell((col, row))
            .map(|c| c.get_value().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn header_and_rows_in_column_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.xlsx");
        write_rows(&path, &[row("11222333000181", "ACME LTDA"), row("00004321000199", "BETA SA")]).unwrap();

        assert_eq!(read_text(&path, 1, 1), "cnpj");
        assert_eq!(read_text(&path, 2, 1), "razao_social");
        assert_eq!(read_text(&path, 3, 1), "opcao_pelo_simples");
        assert_eq!(read_text(&path, 4, 1), "opcao_pelo_mei");
        assert_eq!(read_text(&path, 1, 2), "11222333000181");
        assert_eq!(read_text(&path, 2, 2), "ACME LTDA");
        assert_eq!(read_text(&path, 1, 3), "00004321000199");
        assert_eq!(read_text(&path, 2, 3), "BETA SA");
    }

    #[test]
    fn extra_columns_are_dropped() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.xlsx");
        let mut r = row("11222333000181", "ACME");
        r.insert("uf".into(), json!("SP"));
        write_rows(&path, &[r]).unwrap();

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet_by_name(SHEET_NAME).unwrap();
        assert_eq!(sheet.get_highest_column(), 4);
    }

    #[test]
    fn missing_column_fails_before_writing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.xlsx");
        let mut broken = row("11222333000181", "ACME");
        broken.remove("opcao_pelo_mei");

        let result = write_rows(&path, &[row("00004321000199", "BETA"), broken]);
        match result {
            Err(StoreError::MissingColumns { row, missing }) => {
                assert_eq!(row, 1);
                assert_eq!(missing, vec!["opcao_pelo_mei"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn empty_rows_write_header_only() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.xlsx");
        write_rows(&path, &[]).unwrap();

        assert_eq!(read_text(&path, 1, 1), "cnpj");
        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        assert_eq!(book.get_sheet_by_name(SHEET_NAME).unwrap().get_highest_row(), 1);
    }
}
