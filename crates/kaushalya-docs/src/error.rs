use thiserror::Error;

/// Failures while serializing or saving a generated document.
///
/// Record data never causes these; malformed fields degrade to placeholders.
#[derive(Debug, Error)]
pub enum DocsError {
    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("spreadsheet packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("spreadsheet XML generation failed: {0}")]
    Xml(String),

    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
