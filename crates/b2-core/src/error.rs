//! Error types for the B2HHH tools.

use thiserror::Error;

/// Failure opening or decoding an event container.
///
/// Every variant arises while opening the container or pulling records
/// from it; nothing below `main` catches or retries.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container-level failure (unreadable footer, corrupt page, decode error).
    #[error("container error: {0}")]
    Container(String),

    /// The file's columns do not match the decay event layout.
    #[error("schema error: {0}")]
    Schema(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
