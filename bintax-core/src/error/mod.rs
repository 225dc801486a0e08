//! Core error types for bintax

use thiserror::Error;

/// Main error type for bintax operations
#[derive(Error, Debug)]
pub enum BintaxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("empty BIN group: {bin}")]
    EmptyGroup { bin: String },

    #[error("rank list is empty")]
    InsufficientRanks,

    #[error("lineage has {found} labels but {expected} ranks are configured")]
    RankMismatch { expected: usize, found: usize },

    #[error("record {record} has no label at root rank '{rank}'")]
    MissingRootLabel { record: String, rank: String },

    #[error("consensus threshold {value} outside (0, 100]")]
    InvalidThreshold { value: f64 },

    #[error("conflict for '{label}' at rank '{rank}' survived repair")]
    UnresolvableConflict { rank: String, label: String },
}

/// Result type alias for bintax operations
pub type BintaxResult<T> = Result<T, BintaxError>;

impl From<csv::Error> for BintaxError {
    fn from(err: csv::Error) -> Self {
        BintaxError::Parse(err.to_string())
    }
}
