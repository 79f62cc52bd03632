//! Error types for srms.
//!
//! Only infrastructure failures surface as errors. A stale record id or an
//! incomplete form is an expected outcome and is reported through return
//! values instead (`Option`, `bool`, [`crate::session::Outcome`]).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for srms operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to bring the database schema up to date.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Record Errors ===
    /// Text could not be parsed as a record id.
    #[error("invalid record id '{input}': expected a positive integer")]
    InvalidId {
        /// The rejected input.
        input: String,
    },

    /// No record exists with the given id.
    #[error("no record with id {id}")]
    NotFound {
        /// The id that was looked up.
        id: i64,
    },

    /// Every id above the last issued one is taken.
    #[error("no record ids left after {last}")]
    IdsExhausted {
        /// The last id issued.
        last: i64,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for srms operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid id error for the given input.
    #[must_use]
    pub fn invalid_id(input: impl Into<String>) -> Self {
        Self::InvalidId {
            input: input.into(),
        }
    }
}
