use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{tool} CLI not found. Install it:\n{hint}")]
    ToolMissing { tool: String, hint: String },

    #[error("Failed to process {item:?}: {reason}")]
    ItemProcessing { item: PathBuf, reason: String },

    #[error("Failed to create output directory {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("WebP encoding error: {0}")]
    Encode(String),

    #[error("Walkdir error: {0}")]
    Walkdir(#[from] walkdir::Error),
}

impl PipelineError {
    pub fn item(item: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PipelineError::ItemProcessing {
            item: item.into(),
            reason: reason.to_string(),
        }
    }

    /// Attributes this error to `item`, unless it already names one.
    pub fn for_item(self, item: impl Into<PathBuf>) -> Self {
        match self {
            PipelineError::ItemProcessing { .. } => self,
            other => PipelineError::item(item, other),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
