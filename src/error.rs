//! Error types for the messaging backend.

use thiserror::Error;

/// Common error type for messagerie operations.
#[derive(Error, Debug)]
pub enum MessagerieError {
    /// Database error.
    ///
    /// Generic database error wrapping anything the sqlx driver reports.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// One or more recipient emails do not match any user.
    #[error("unknown recipients: {0:?}")]
    UnknownRecipients(Vec<String>),

    /// Uploaded file has a MIME type outside the allow-list.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Uploaded file exceeds the size limit.
    #[error("file too large: {size} bytes (max {max})")]
    FileTooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        max: u64,
    },

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for MessagerieError {
    fn from(e: sqlx::Error) -> Self {
        MessagerieError::Database(e.to_string())
    }
}

/// Result type alias for messagerie operations.
pub type Result<T> = std::result::Result<T, MessagerieError>;
