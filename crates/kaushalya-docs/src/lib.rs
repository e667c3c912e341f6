//! Client-side documents generated from order and customer records: the
//! printable invoice PDF and the single-sheet `.xlsx` export.

pub mod error;
pub mod export;
pub mod invoice;
mod xlsx;

pub use error::DocsError;
pub use export::{build_workbook, write_export, ExportKind};
pub use invoice::{invoice_file_name, render_invoice, write_invoice, InvoiceView};

use std::path::{Path, PathBuf};

/// Replaces characters that are unsafe in file names with `_`.
#[must_use]
pub fn sanitize_file_stem(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "unknown".to_owned()
    } else {
        cleaned
    }
}

/// Writes `bytes` to `dir/file_name`, creating `dir` if needed.
pub(crate) fn save_bytes(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DocsError> {
    let io_err = |path: &Path, source| DocsError::Io {
        path: path.display().to_string(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).map_err(|e| io_err(&path, e))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "document written");
    Ok(path)
}
