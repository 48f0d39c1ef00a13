use std::{io, path::PathBuf};
use thiserror::Error;

/// Boxed error returned by a [`crate::db::RowSink`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can stop a load. None of these are retried.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The date argument is not a calendar date
    #[error("invalid report date {input:?}: expected YYYY-MM-DD")]
    InvalidDate { input: String },

    /// The input file is missing or unreadable
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed CSV, or a cell that does not coerce to its column type
    #[error("line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// The file is empty, so there is no header row to map columns from
    #[error("{}: missing header row", .path.display())]
    MissingHeader { path: PathBuf },

    /// Missing or unusable connection settings
    #[error("database configuration: {0}")]
    Config(String),

    /// The database could not be reached
    #[error("connecting to database: {0}")]
    Connect(#[source] tokio_postgres::Error),

    /// The database rejected a row
    #[error("line {line}: insert into {table} failed: {source}")]
    Insert {
        line: u64,
        table: &'static str,
        #[source]
        source: BoxError,
    },
}

impl LoadError {
    /// Process exit code for this failure. `1` is left for usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidDate { .. } => 2,
            Self::Io { .. } => 3,
            Self::Csv { .. } | Self::MissingHeader { .. } => 4,
            Self::Config(_) | Self::Connect(_) => 5,
            Self::Insert { .. } => 6,
        }
    }

    /// File line the failure is attached to, if any.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Csv { line, .. } | Self::Insert { line, .. } => Some(*line),
            _ => None,
        }
    }
}
