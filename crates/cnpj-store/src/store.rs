use std::path::PathBuf;

use cnpj_core::results::{self, Row};
use cnpj_core::{CompanyRecord, ErrorLogDetail, FailedLookup, OutputConfig};

use crate::layout::OutputLayout;
use crate::{StoreError, error_log, table};

/// Persistence for enrichment output.
///
/// Owns the resolved output root; nothing here reads the environment.
/// Result workbooks land in `Resultado XLSX`, the error log in
/// `Log de erros de CNPJ/log.txt`.
#[derive(Debug, Clone)]
pub struct ResultStore {
    layout: OutputLayout,
    log_detail: ErrorLogDetail,
}

impl ResultStore {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            layout: OutputLayout::under(&config.root),
            log_detail: config.log_detail,
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Create the output folders if missing. Safe to call repeatedly.
    pub fn ensure_output_layout(&self) -> Result<(), StoreError> {
        self.layout.ensure()
    }

    /// Write generic rows as a four-column results workbook.
    ///
    /// Fails with [`StoreError::MissingColumns`] if any row lacks a column.
    pub fn write_results_table(&self, rows: &[Row], filename: &str) -> Result<PathBuf, StoreError> {
        self.ensure_output_layout()?;
        let path = self.layout.results_path(filename);
        table::write_rows(&path, rows)?;
        Ok(path)
    }

    /// Write successful records as a results workbook.
    pub fn write_records(&self, records: &[CompanyRecord], filename: &str) -> Result<PathBuf, StoreError> {
        let rows: Vec<Row> = records.iter().map(results::row_from_record).collect();
        self.write_results_table(&rows, filename)
    }

    /// Overwrite the error log with `failed`; does nothing for an empty list.
    ///
    /// Returns the log path when a file was written.
    pub fn write_error_log(&self, failed: &[FailedLookup]) -> Result<Option<PathBuf>, StoreError> {
        if !failed.is_empty() {
            self.ensure_output_layout()?;
        }
        let path = self.layout.error_log_path();
        let written = error_log::write(&path, failed, self.log_detail)?;
        Ok(written.then_some(path))
    }
}
