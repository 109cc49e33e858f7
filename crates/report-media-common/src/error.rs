//! Error taxonomy for the report media store.
//!
//! Every failure of an ingest or retrieval call lands in [`Error`], which
//! distinguishes caller mistakes (4xx) from storage faults (5xx) through
//! [`Error::http_status`].

use std::fmt;
use std::io;

/// Error type covering all failure modes of the media store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller omitted or malformed a required field.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A retrieval path points outside the managed namespace.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The request body exceeds the configured upload limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The path is well formed but no file exists there.
    #[error("File not found: {path}")]
    NotFound {
        /// The relative path that was looked up.
        path: String,
    },

    /// Writing one file of an ingest batch failed.
    #[error("Failed to store {file}: {source}")]
    StorageWriteFailed {
        /// Name of the file that could not be written.
        file: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading a stored file failed for a reason other than absence.
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        /// The relative path that was being read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Catch-all for faults outside the storage layer.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidInput(_) => 400,
            Error::InvalidPath(_) => 400,
            Error::PayloadTooLarge(_) => 413,
            Error::NotFound { .. } => 404,
            Error::StorageWriteFailed { .. } => 500,
            Error::ReadFailed { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::InvalidPath(_) => "invalid_path",
            Error::PayloadTooLarge(_) => "payload_too_large",
            Error::NotFound { .. } => "not_found",
            Error::StorageWriteFailed { .. } => "storage_write_failed",
            Error::ReadFailed { .. } => "read_failed",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Whether the caller, rather than the storage layer, is at fault.
    pub fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new InvalidPath error.
    pub fn invalid_path<S: Into<String>>(msg: S) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a new PayloadTooLarge error.
    pub fn payload_too_large<S: Into<String>>(msg: S) -> Self {
        Self::PayloadTooLarge(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found(path: impl fmt::Display) -> Self {
        Self::NotFound {
            path: path.to_string(),
        }
    }

    /// Create a new StorageWriteFailed error.
    pub fn write_failed(file: impl Into<String>, source: io::Error) -> Self {
        Self::StorageWriteFailed {
            file: file.into(),
            source,
        }
    }

    /// Create a new ReadFailed error.
    pub fn read_failed(path: impl Into<String>, source: io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the store's Error type.
pub type Result<T> = std::result::Result<T, Error>;
