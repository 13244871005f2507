//! Error handling for the keyword resolver
//!
//! The resolution engine itself never fails; these errors only come from
//! the edges (configuration, table loading, input files, report output).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Equivalence table error: {0}")]
    EquivalenceTable(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResolverError>;
