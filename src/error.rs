//! Error types for the wordshard library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`WordShardError`] enum. A word that is simply absent from a store is not
//! an error: lookups report it as `Ok(None)` or `Ok(false)`.
//!
//! # Examples
//!
//! ```
//! use wordshard::error::{Result, WordShardError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(WordShardError::invalid_config("prefix length must be at least 1"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for wordshard operations.
#[derive(Error, Debug)]
pub enum WordShardError {
    /// I/O errors (container unreadable, entry stream broken, ...)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors raised by the zip container
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A named storage entry does not exist
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// The builder received a word whose shard key sorts before the open shard.
    #[error("Unsorted input: key '{current}' of word '{word}' follows key '{previous}'")]
    UnsortedInput {
        previous: String,
        current: String,
        word: String,
    },

    /// A word that cannot be stored as a line of a shard entry
    #[error("Invalid word: {0}")]
    InvalidWord(String),

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for operations that may fail with WordShardError.
pub type Result<T> = std::result::Result<T, WordShardError>;

impl WordShardError {
    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        WordShardError::Storage(msg.into())
    }

    /// Create a new entry-not-found error.
    pub fn entry_not_found<S: Into<String>>(name: S) -> Self {
        WordShardError::EntryNotFound(name.into())
    }

    /// Create a new invalid word error.
    pub fn invalid_word<S: Into<String>>(msg: S) -> Self {
        WordShardError::InvalidWord(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        WordShardError::InvalidConfig(msg.into())
    }
}
