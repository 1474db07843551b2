//! Common error types for the 4B engine crates

use thiserror::Error;

/// Common result type for 4B engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the 4B engine crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal engine error
    #[error("Internal error: {0}")]
    Internal(String),
}
