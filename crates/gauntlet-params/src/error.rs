//! Error types for argument resolution.

use gauntlet_core::PreconditionError;
use thiserror::Error;

/// Low-level CSV reader failure, positioned at a zero-based record index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsvTokenError {
    #[error("unterminated quoted field in record at index {record}")]
    UnterminatedQuote { record: usize },

    #[error("unexpected character after closing quote in record at index {record}")]
    StrayQuote { record: usize },

    #[error("a column in record at index {record} exceeds the limit of {limit} characters")]
    ColumnTooLong { record: usize, limit: usize },

    #[error("record at index {record} has {columns} columns, but only {headers} headers")]
    TooManyColumns {
        record: usize,
        columns: usize,
        headers: usize,
    },

    #[error("could not decode {path} as {charset}")]
    Decode { charset: String, path: String },
}

/// Errors surfaced by argument-source resolution.
///
/// Configuration mistakes propagate as [`PreconditionError`]s, unwrapped.
/// Malformed CSV content wraps the reader failure and names the declaring
/// source.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("failed to parse CSV content for {declaration}: {source}")]
    Csv {
        declaration: String,
        #[source]
        source: CsvTokenError,
    },

    #[error("failed to read CSV source {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Whether this is a configuration (precondition) error.
    pub fn is_precondition(&self) -> bool {
        matches!(self, ResolveError::Precondition(_))
    }
}

/// Result type for argument-source resolution
pub type Result<T> = std::result::Result<T, ResolveError>;
