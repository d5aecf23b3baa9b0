//! Candidate extraction from an input workbook.
//!
//! The workbook has no schema and no header row: every non-empty cell of the
//! first worksheet is a candidate, in row-major, left-to-right order.

use std::path::Path;

use tracing::info;

use crate::StoreError;

/// Read every non-empty cell of the first worksheet of an `.xlsx` file.
///
/// Fails when the file is not `.xlsx`, cannot be parsed, or holds no
/// non-empty cells. Callers should treat an error as "no results" for the
/// whole invocation, not as "zero CNPJs found".
pub fn extract_candidates(path: &Path) -> Result<Vec<String>, StoreError> {
    let is_xlsx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if !is_xlsx {
        return Err(StoreError::UnsupportedFormat(path.to_path_buf()));
    }

    let book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| StoreError::spreadsheet(path, e))?;
    let sheet = book
        .get_sheet_collection()
        .first()
        .ok_or_else(|| StoreError::EmptySource(path.to_path_buf()))?;

    let (max_col, max_row) = sheet.get_highest_column_and_row();
    let mut candidates = Vec::new();
    for row in 1..=max_row {
        for col in 1..=max_col {
            let Some(cell) = sheet.get_cell((col, row)) else {
                continue;
            };
            let value = cell.get_value();
            let value = value.trim();
            if !value.is_empty() {
                candidates.push(value.to_string());
            }
        }
    }

    if candidates.is_empty() {
        return Err(StoreError::EmptySource(path.to_path_buf()));
    }
    info!(path = %path.display(), count = candidates.len(), "extracted candidates");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_book(path: &Path, cells: &[((u32, u32), &str)]) {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        for &(coord, value) in cells {
            sheet.get_cell_mut(coord).set_value_string(value);
        }
        umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
    }

    #[test]
    fn cells_are_read_row_major() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("input.xlsx");
        write_book(
            &path,
            &[
                ((1, 1), "CNPJ"),
                ((2, 1), "Empresa"),
                ((1, 2), "11.222.333/0001-81"),
                ((3, 2), "4321000199"),
                ((2, 3), "19131243000197"),
            ],
        );

        let candidates = extract_candidates(&path).unwrap();
        assert_eq!(
            candidates,
            vec![
                "CNPJ",
                "Empresa",
                "11.222.333/0001-81",
                "4321000199",
                "19131243000197"
            ]
        );
    }

    #[test]
    fn numeric_cells_read_as_plain_digits() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("numbers.xlsx");
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.get_cell_mut((1u32, 1u32)).set_value_number(4321000199.0);
        sheet.get_cell_mut((1u32, 2u32)).set_value_number(11222333000181.0);
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        let candidates = extract_candidates(&path).unwrap();
        assert_eq!(candidates, vec!["4321000199", "11222333000181"]);

        let ids: Vec<String> = candidates
            .iter()
            .filter_map(|c| cnpj_core::Identifier::from_cell(c))
            .map(|id| id.into_inner())
            .collect();
        assert_eq!(ids, vec!["00004321000199", "11222333000181"]);
    }

    #[test]
    fn blank_cells_are_skipped() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("input.xlsx");
        write_book(&path, &[((1, 1), "   "), ((1, 2), "11222333000181")]);

        let candidates = extract_candidates(&path).unwrap();
        assert_eq!(candidates, vec!["11222333000181"]);
    }

    #[test]
    fn empty_workbook_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("empty.xlsx");
        write_book(&path, &[]);

        let result = extract_candidates(&path);
        assert!(matches!(result, Err(StoreError::EmptySource(_))));
    }

    #[test]
    fn unreadable_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let result = extract_candidates(&path);
        assert!(matches!(result, Err(StoreError::Spreadsheet { .. })));
    }

    #[test]
    fn non_xlsx_is_unsupported() {
        let result = extract_candidates(Path::new("/tmp/input.csv"));
        assert!(matches!(result, Err(StoreError::UnsupportedFormat(_))));
    }
}
