//! Output folder layout under the user's documents root.

use std::fs;
use std::path::{Path, PathBuf};

use cnpj_core::config::{ERROR_LOG_DIR_NAME, ERROR_LOG_FILE_NAME, OUTPUT_DIR_NAME, RESULTS_DIR_NAME};
use tracing::debug;

use crate::StoreError;

/// `<root>/Consulta de CNPJ/{Resultado XLSX, Log de erros de CNPJ}`.
///
/// Folders are created lazily by [`ensure`](Self::ensure) and never removed.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    base: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `root` (usually the documents directory).
    pub fn under(root: &Path) -> Self {
        Self {
            base: root.join(OUTPUT_DIR_NAME),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base.join(RESULTS_DIR_NAME)
    }

    pub fn error_log_dir(&self) -> PathBuf {
        self.base.join(ERROR_LOG_DIR_NAME)
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.error_log_dir().join(ERROR_LOG_FILE_NAME)
    }

    pub fn results_path(&self, filename: &str) -> PathBuf {
        self.results_dir().join(filename)
    }

    /// Create the base folder and both subfolders if missing.
    pub fn ensure(&self) -> Result<(), StoreError> {
        for dir in [self.base.clone(), self.results_dir(), self.error_log_dir()] {
            if !dir.is_dir() {
                fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
                debug!(dir = %dir.display(), "created output folder");
            }
        }
        Ok(())
    }
}
