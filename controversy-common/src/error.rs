//! Common error types for the controversy catalogue

use thiserror::Error;

/// Common result type for catalogue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the catalogue crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unique constraint collision (e.g. a slug already in use)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Row is still referenced and cannot be deleted
    #[error("Protected: {0}")]
    Protected(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
