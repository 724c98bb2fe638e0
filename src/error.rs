//! Error types for the floor-plan exporter.

use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Main error type for export operations.
///
/// Only the variants marked fatal escape [`Exporter::export`](crate::Exporter::export);
/// the rest are caught per element and turned into a fallback.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Failed to read or write a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse or write JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource could not be fetched.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Model archive has an unusable layout (e.g. no mesh file).
    #[error("Invalid model archive: {0}")]
    InvalidArchive(String),

    /// Mesh text could not be parsed.
    #[error("OBJ parse error at line {line}: {message}")]
    ObjParse { line: usize, message: String },

    /// A configured library could not be loaded. Fatal.
    #[error("Required library unavailable: {0}")]
    LibraryUnavailable(String),

    /// No architectural model was supplied. Fatal.
    #[error("No home to export")]
    MissingHome,

    /// The home has no walls, rooms or furniture. Fatal.
    #[error("Export failed: home is empty (no walls, rooms or furniture)")]
    EmptyHome,

    /// Items existed but none of them produced geometry. Fatal.
    #[error("Export failed: {0} item(s) existed but produced no geometry")]
    NoGeometry(usize),

    /// Failed to serialize or package the output.
    #[error("Export error: {0}")]
    Export(String),
}

impl ExportError {
    /// Build a parse error for a 1-based line number.
    pub(crate) fn obj_parse(line: usize, message: impl Into<String>) -> Self {
        Self::ObjParse {
            line,
            message: message.into(),
        }
    }
}
