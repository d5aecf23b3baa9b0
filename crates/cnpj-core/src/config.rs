//! Shared configuration consumed by the lookup and store crates.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default registry host.
pub const DEFAULT_BASE_URL: &str = "https://brasilapi.com.br";
/// Default cap on lookups in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 10;
/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Folder created under the documents root.
pub const OUTPUT_DIR_NAME: &str = "Consulta de CNPJ";
/// Subfolder holding result workbooks.
pub const RESULTS_DIR_NAME: &str = "Resultado XLSX";
/// Subfolder holding the error log.
pub const ERROR_LOG_DIR_NAME: &str = "Log de erros de CNPJ";
/// Fixed error log file name.
pub const ERROR_LOG_FILE_NAME: &str = "log.txt";

/// Results workbook written by the batch path.
pub const BATCH_RESULTS_FILE: &str = "resultado_consulta.xlsx";
/// Results workbook written by the single-lookup path.
pub const SINGLE_RESULT_FILE: &str = "resultado_cnpj.xlsx";

#[derive(Debug, Error)]
#[error("unknown log detail '{0}' (expected 'fixed' or 'cause')")]
pub struct ParseLogDetailError(String);

/// How much detail each error log line carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorLogDetail {
    /// `<cnpj>: CNPJ não encontrado na API Minha Receita` for every failure.
    #[default]
    Fixed,
    /// The fixed line followed by the actual failure message.
    Cause,
}

impl FromStr for ErrorLogDetail {
    type Err = ParseLogDetailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "cause" => Ok(Self::Cause),
            other => Err(ParseLogDetailError(other.to_string())),
        }
    }
}

impl fmt::Display for ErrorLogDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fixed => "fixed",
            Self::Cause => "cause",
        })
    }
}

/// Lookup client settings.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Registry base URL, without trailing slash.
    pub base_url: String,
    /// `None` leaves the transport default (no timeout).
    pub timeout: Option<Duration>,
    /// Maximum lookups in flight; `0` means unbounded.
    pub concurrency: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl LookupConfig {
    /// Build from a timeout in seconds where `0` disables the timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }
}

/// Persistence settings.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Documents root; the output folder is created beneath it.
    pub root: PathBuf,
    pub log_detail: ErrorLogDetail,
}

impl OutputConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            log_detail: ErrorLogDetail::default(),
        }
    }
}
