use thiserror::Error;

/// Errors from the rasterizer and OCR collaborators.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A required external binary is not installed.
    #[error("tool not available: {0}")]
    ToolMissing(String),

    /// The external tool ran but reported failure.
    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
