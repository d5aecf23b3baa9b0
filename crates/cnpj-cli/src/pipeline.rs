//! Enrichment pipelines: workbook → normalise → batch lookup → persist, and
//! the single-CNPJ shortcut.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cnpj_core::config::{BATCH_RESULTS_FILE, SINGLE_RESULT_FILE};
use cnpj_core::{BatchReport, EnrichmentResult, filter_candidates};
use cnpj_lookup::{BatchRunner, Lookup};
use cnpj_store::ResultStore;
use tracing::{debug, info, warn};

pub struct BatchStats {
    pub candidates: usize,
    pub rejected: usize,
    pub results_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
}

/// Run the full batch pipeline for one workbook.
///
/// A workbook that cannot be read is an error for the whole invocation.
/// Persistence failures are logged and do not discard the report.
pub async fn run_batch_pipeline<L: Lookup>(
    runner: &BatchRunner<L>,
    store: &ResultStore,
    source: &Path,
) -> anyhow::Result<(BatchReport, BatchStats)> {
    // 1. Extract every non-empty cell.
    let candidates = cnpj_store::extract_candidates(source)
        .with_context(|| format!("reading {}", source.display()))?;

    // 2. Keep the cells that normalise to a CNPJ.
    let filtered = filter_candidates(&candidates);
    for rejected in &filtered.rejected {
        debug!(cell = %rejected, "skipping cell that is not a CNPJ");
    }
    info!(
        candidates = candidates.len(),
        valid = filtered.valid.len(),
        rejected = filtered.rejected.len(),
        "normalised candidates"
    );

    // 3. Fan out lookups and wait for all of them.
    let report = runner.run_batch(&filtered.valid).await;

    // 4. Persist successes and the error log.
    if let Err(e) = store.ensure_output_layout() {
        warn!(error = %e, "could not create output folders");
    }

    let successes = report.successes();
    let results_path = if successes.is_empty() {
        info!("no successful lookups to save");
        None
    } else {
        match store.write_records(&successes, BATCH_RESULTS_FILE) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "failed to save results table");
                None
            }
        }
    };

    let log_path = match store.write_error_log(&report.failed) {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "failed to save error log");
            None
        }
    };

    let stats = BatchStats {
        candidates: candidates.len(),
        rejected: filtered.rejected.len(),
        results_path,
        log_path,
    };
    Ok((report, stats))
}

/// Look up one typed CNPJ and save it on success.
///
/// Returns the result and, when saved, the workbook path. A failed lookup
/// writes nothing, not even the error log.
pub async fn run_single_pipeline<L: Lookup>(
    runner: &BatchRunner<L>,
    store: &ResultStore,
    raw: &str,
) -> (EnrichmentResult, Option<PathBuf>) {
    let result = runner.enrich_one(raw).await;
    let Some(record) = result.record() else {
        return (result, None);
    };

    let saved = match store.write_records(std::slice::from_ref(record), SINGLE_RESULT_FILE) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, "failed to save result");
            None
        }
    };
    (result, saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnpj_core::{LookupConfig, OutputConfig};
    use cnpj_lookup::LookupClient;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write_input(path: &Path, cells: &[&str]) {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        for (i, value) in cells.iter().enumerate() {
            sheet.get_cell_mut((1u32, i as u32 + 1)).set_value_string(*value);
        }
        umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
    }

    fn runner(server: &MockServer) -> BatchRunner<LookupClient> {
        let config = LookupConfig {
            base_url: server.uri(),
            ..LookupConfig::default()
        };
        BatchRunner::new(LookupClient::new(&config).unwrap(), config.concurrency)
    }

    async fn mount_company(server: &MockServer, cnpj: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/cnpj/v1/{cnpj}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cnpj": cnpj,
                "razao_social": format!("EMPRESA {cnpj}"),
                "opcao_pelo_simples": false,
                "opcao_pelo_mei": true
            })))
            .mount(server)
            .await;
    }

    async fn mount_missing(server: &MockServer, cnpj: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/cnpj/v1/{cnpj}")))
            .respond_with(ResponseTemplate::new(404))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn batch_writes_table_and_log() {
        let server = MockServer::start().await;
        mount_company(&server, "11222333000181").await;
        mount_missing(&server, "00004321000199").await;

        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("input.xlsx");
        write_input(&input, &["CNPJ", "11.222.333/0001-81", "4321000199"]);
        let store = ResultStore::new(&OutputConfig::new(tmp.path()));

        let (report, stats) = run_batch_pipeline(&runner(&server), &store, &input)
            .await
            .unwrap();

        assert_eq!(stats.candidates, 3);
        assert_eq!(stats.rejected, 1);
        assert_eq!(report.len(), 2);
        assert!(report.results[0].is_success());
        assert!(!report.results[1].is_success());

        let results_path = stats.results_path.unwrap();
        assert_eq!(results_path, store.layout().results_path("resultado_consulta.xlsx"));
        let book = umya_spreadsheet::reader::xlsx::read(&results_path).unwrap();
        let sheet = book.get_sheet_by_name("Sheet1").unwrap();
        assert_eq!(sheet.get_highest_row(), 2);

        let log = std::fs::read_to_string(stats.log_path.unwrap()).unwrap();
        assert_eq!(log, "00004321000199: CNPJ não encontrado na API Minha Receita\n");
    }

    #[tokio::test]
    async fn all_success_batch_keeps_stale_log() {
        let server = MockServer::start().await;
        mount_company(&server, "11222333000181").await;

        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("input.xlsx");
        write_input(&input, &["11222333000181"]);
        let store = ResultStore::new(&OutputConfig::new(tmp.path()));
        store.ensure_output_layout().unwrap();
        let log_path = store.layout().error_log_path();
        std::fs::write(&log_path, "stale\n").unwrap();

        let (report, stats) = run_batch_pipeline(&runner(&server), &store, &input)
            .await
            .unwrap();

        assert!(report.failed.is_empty());
        assert!(stats.log_path.is_none());
        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "stale\n");
    }

    #[tokio::test]
    async fn blocked_output_folder_keeps_report() {
        let server = MockServer::start().await;
        mount_company(&server, "11222333000181").await;
        mount_missing(&server, "00004321000199").await;

        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("input.xlsx");
        write_input(&input, &["11222333000181", "4321000199"]);
        let store = ResultStore::new(&OutputConfig::new(tmp.path()));
        std::fs::write(store.layout().base(), b"not a folder").unwrap();

        let (report, stats) = run_batch_pipeline(&runner(&server), &store, &input)
            .await
            .unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(stats.results_path.is_none());
        assert!(stats.log_path.is_none());
        assert!(store.layout().base().is_file());
    }

    #[tokio::test]
    async fn unreadable_workbook_is_an_error() {
        let server = MockServer::start().await;
        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("broken.xlsx");
        std::fs::write(&input, b"garbage").unwrap();
        let store = ResultStore::new(&OutputConfig::new(tmp.path()));

        let result = run_batch_pipeline(&runner(&server), &store, &input).await;
        assert!(result.is_err());
        assert!(!store.layout().base().exists());
    }

    #[tokio::test]
    async fn single_success_is_saved() {
        let server = MockServer::start().await;
        mount_company(&server, "11222333000181").await;
        let tmp = tempfile::TempDir::new().unwrap();
        let store = ResultStore::new(&OutputConfig::new(tmp.path()));

        let (result, saved) =
            run_single_pipeline(&runner(&server), &store, "11.222.333/0001-81").await;
        assert!(result.is_success());
        assert_eq!(saved.unwrap(), store.layout().results_path("resultado_cnpj.xlsx"));
    }

    #[tokio::test]
    async fn invalid_single_input_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let tmp = tempfile::TempDir::new().unwrap();
        let store = ResultStore::new(&OutputConfig::new(tmp.path()));

        let (result, saved) = run_single_pipeline(&runner(&server), &store, "123").await;
        assert!(!result.is_success());
        assert!(saved.is_none());
        assert!(!store.layout().base().exists());
    }
}
