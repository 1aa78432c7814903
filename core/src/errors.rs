use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur with finding the config or data directories.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Unable to find the config directory for trackdash.")]
    Config,
    #[error("Unable to find the data directory for trackdash.")]
    Data,
}

/// Errors that can occur while loading a dataset.
///
/// Individual malformed rows are not errors, see [`crate::track::Rejection`].
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),
    #[error("Dataset load task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for DatasetError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(e.to_string())
    }
}
