mod display;
mod pipeline;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cnpj_core::config::{DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use cnpj_core::{ErrorLogDetail, LookupConfig, OutputConfig};
use cnpj_lookup::{BatchRunner, LookupClient};
use cnpj_store::ResultStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cnpj", version, about = "Enrich CNPJ numbers with BrasilAPI registry data")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Documents root; output goes to `<root>/Consulta de CNPJ`.
    #[arg(long, global = true, env = "CNPJ_OUTPUT_ROOT")]
    output_root: Option<PathBuf>,

    /// Registry base URL.
    #[arg(long, global = true, env = "CNPJ_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Maximum lookups in flight (0 = no cap).
    #[arg(long, global = true, env = "CNPJ_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-request timeout in seconds (0 = none).
    #[arg(long, global = true, env = "CNPJ_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Error log line detail: `fixed` or `cause`.
    #[arg(long, global = true, env = "CNPJ_LOG_DETAIL", default_value_t = ErrorLogDetail::Fixed)]
    log_detail: ErrorLogDetail,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a single CNPJ and save it to resultado_cnpj.xlsx.
    Consulta {
        /// CNPJ, with or without punctuation.
        cnpj: String,
    },
    /// Look up every CNPJ found in an .xlsx workbook.
    Lote {
        /// Input workbook.
        file: PathBuf,
    },
}

impl Cli {
    fn lookup_config(&self) -> LookupConfig {
        LookupConfig {
            base_url: self.base_url.clone(),
            concurrency: self.concurrency,
            ..LookupConfig::default()
        }
        .with_timeout_secs(self.timeout_secs)
    }

    fn output_config(&self) -> anyhow::Result<OutputConfig> {
        let root = match &self.output_root {
            Some(root) => root.clone(),
            None => documents_dir().context("could not locate the documents folder; pass --output-root")?,
        };
        let mut config = OutputConfig::new(root);
        config.log_detail = self.log_detail;
        Ok(config)
    }
}

/// The user's documents folder, falling back to `~/Documents`.
fn documents_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    tracing::info!("cnpj v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let lookup_config = cli.lookup_config();
    let output_config = cli.output_config()?;

    let client = LookupClient::new(&lookup_config).context("building HTTP client")?;
    let runner = BatchRunner::new(client, lookup_config.concurrency);
    let store = ResultStore::new(&output_config);

    match &cli.command {
        Command::Consulta { cnpj } => {
            let (result, saved) = pipeline::run_single_pipeline(&runner, &store, cnpj).await;
            display::print_result(&result, saved.as_ref());
        }
        Command::Lote { file } => {
            let (report, stats) = pipeline::run_batch_pipeline(&runner, &store, file).await?;
            display::print_batch_summary(&report, &stats);
        }
    }

    Ok(())
}
