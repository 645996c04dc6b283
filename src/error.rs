//! Error types for the store and the menu.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reading, writing or locking the backing file, or updating a record.
///
/// Business outcomes (unknown event, sold out, duplicate name) are never
/// errors; the store reports them as `false` or `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure on the backing file or one of its sidecars.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file is not a valid event map (bad JSON, bad shape, bad date).
    #[error("malformed event file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Cancelling would push the ticket count past `i64::MAX`.
    #[error("ticket count for {name:?} is at its maximum")]
    TicketOverflow { name: String },

    /// Another store opened with [`LockMode::Exclusive`](crate::LockMode) holds the file.
    #[error("another process holds the lock on {}", path.display())]
    Locked { path: PathBuf },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Date text that does not match `YYYY-MM-DD HH:MM`.
#[derive(Debug, Error)]
#[error("invalid date {input:?}, expected YYYY-MM-DD HH:MM: {source}")]
pub struct DateError {
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Failures that end an interactive menu session.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading input or writing output failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The store could not persist or parse something.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The date prompt got something that is not `YYYY-MM-DD HH:MM`.
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    /// The ticket count prompt got something that is not an integer.
    #[error("invalid ticket count {input:?}: {source}")]
    InvalidTicketCount {
        input: String,
        #[source]
        source: ParseIntError,
    },
}
