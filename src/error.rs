use std::path::PathBuf;

/// Rejected tile maps. Fatal to starting a session.
#[derive(thiserror::Error, Debug)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,

    #[error("map row {0} has no cells")]
    EmptyRow(usize),

    #[error("map row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("tile length {0} must exceed the one-unit probe nudge")]
    TileTooSmall(f32),

    #[error("invalid cell {found:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, found: char },

    #[error("failed to read map {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rejected engine configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Map(#[from] MapError),
}
