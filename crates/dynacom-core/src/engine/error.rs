use thiserror::Error;

use super::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Chain '{0}' not found in the first model")]
    ChainNotFound(String),

    #[error("No alpha-carbon atoms available for analysis")]
    EmptyModel,

    #[error("Expected a square {expected}x{expected} matrix, got {rows}x{cols}")]
    Dimension {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("No community count in the sweep produced a valid partition score")]
    NoScorableCount,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
