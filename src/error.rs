//! Error types for camb-sdk
//!
//! This module provides the error taxonomy for the library:
//! - [`PersistError`] for local filesystem failures while saving a byte stream
//! - [`PollError`] for the outcome categories of a polling loop (remote failure,
//!   exhausted attempt budget, caller cancellation, or an operation error)
//! - [`Error`], the crate-wide error returned by [`CambClient`](crate::CambClient)
//!   workflows, which flattens both of the above

use crate::types::TaskId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for camb-sdk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for camb-sdk
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api_key")
        key: Option<String>,
    },

    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Response body, or the canonical reason if the body was empty
        message: String,
    },

    /// A response payload was missing a field the workflow needs
    #[error("response missing field `{field}`")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error outside of stream persistence (e.g. reading an upload)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Saving a byte stream to disk failed
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),

    /// The remote side reported the task as failed
    #[error("task {task_id} failed")]
    TaskFailed {
        /// The task that failed
        task_id: TaskId,
    },

    /// The attempt budget ran out before the task reached a terminal state
    #[error("gave up waiting for task {task_id} after {attempts} status checks")]
    TaskTimeout {
        /// The task being waited on
        task_id: TaskId,
        /// Number of status checks performed
        attempts: u32,
    },

    /// The caller cancelled the wait
    #[error("waiting for task {task_id} was cancelled")]
    Cancelled {
        /// The task being waited on
        task_id: TaskId,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub(crate) fn config(message: impl Into<String>, key: &str) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Returns true if the remote task reported failure
    pub fn is_task_failed(&self) -> bool {
        matches!(self, Error::TaskFailed { .. })
    }

    /// Returns true if polling stopped because the attempt budget ran out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::TaskTimeout { .. })
    }

    /// Returns true if polling was cancelled by the caller
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }
}

/// Errors raised while writing a byte stream to a file
#[derive(Debug, Error)]
pub enum PersistError {
    /// The pull source produced no reader
    #[error("empty stream")]
    EmptyStream,

    /// The destination could not be opened for writing
    #[error("failed to create {path}: {source}")]
    Create {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The source failed while producing a chunk
    #[error("failed to read stream for {path} after {bytes_written} bytes: {source}")]
    Read {
        /// Destination path
        path: PathBuf,
        /// Bytes already written to the (partial) destination
        bytes_written: u64,
        /// Underlying error from the source
        #[source]
        source: std::io::Error,
    },

    /// Writing a chunk to the destination failed
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Flushing or syncing the destination failed after all data was written
    #[error("failed to flush {path}: {source}")]
    Flush {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Terminal outcomes of a polling loop other than success
///
/// `E` is the error type of the caller's status and result operations. It is
/// carried untouched in [`PollError::Operation`].
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// The remote side reported the task as failed
    #[error("task {task_id} failed")]
    Failed {
        /// The task that failed
        task_id: TaskId,
    },

    /// `max_attempts` status checks ran without reaching a terminal state
    #[error("gave up waiting for task {task_id} after {attempts} status checks")]
    Timeout {
        /// The task being waited on
        task_id: TaskId,
        /// Number of status checks performed
        attempts: u32,
    },

    /// The cancellation token fired
    #[error("waiting for task {task_id} was cancelled")]
    Cancelled {
        /// The task being waited on
        task_id: TaskId,
    },

    /// A status check or result fetch failed
    #[error(transparent)]
    Operation(E),
}

impl<E> PollError<E> {
    /// Returns the operation error, if this is one
    pub fn into_operation(self) -> Option<E> {
        match self {
            PollError::Operation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PollError<Error>> for Error {
    fn from(err: PollError<Error>) -> Self {
        match err {
            PollError::Failed { task_id } => Error::TaskFailed { task_id },
            PollError::Timeout { task_id, attempts } => Error::TaskTimeout { task_id, attempts },
            PollError::Cancelled { task_id } => Error::Cancelled { task_id },
            PollError::Operation(e) => e,
        }
    }
}
