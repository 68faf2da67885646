//! Error types for the rcpt-core library.
//!
//! Parsing receipt text never fails; malformed lines are simply left out of
//! the result. Errors only come from building pattern sets for a locale and
//! from loading or saving configuration.

use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A pattern built from the locale settings failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;
