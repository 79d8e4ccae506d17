use molbind::engine::error::WorkflowError;
use molbind::engine::transport::{LaunchError, TransportError};
use molbind::core::io::TableLoadError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] WorkflowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid job file: {0}")]
    Job(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TableLoadError> for CliError {
    fn from(e: TableLoadError) -> Self {
        CliError::Core(e.into())
    }
}

impl From<LaunchError> for CliError {
    fn from(e: LaunchError) -> Self {
        CliError::Core(e.into())
    }
}

impl From<TransportError> for CliError {
    fn from(e: TransportError) -> Self {
        CliError::Core(e.into())
    }
}
