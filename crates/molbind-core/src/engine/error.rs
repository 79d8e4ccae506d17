use thiserror::Error;

use super::config::ConfigError;
use super::transport::{LaunchError, TransportError};
use crate::core::io::TableLoadError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load input table: {source}")]
    Table {
        #[from]
        source: TableLoadError,
    },

    #[error("Viewer communication failed: {source}")]
    Transport {
        #[from]
        source: TransportError,
    },

    #[error("Viewer launch failed: {source}")]
    Launch {
        #[from]
        source: LaunchError,
    },

    #[error("Only {found} superposable position(s) found; at least {required} are needed")]
    InsufficientPositions { found: usize, required: usize },

    #[error("Got {structures} structure binding(s) for {sequences} aligned sequence(s)")]
    StructureCountMismatch { sequences: usize, structures: usize },

    #[error("Superposition needs at least two structures, found {0}")]
    TooFewStructures(usize),
}
