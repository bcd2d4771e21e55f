//! Crate error types

use thiserror::Error;

/// Errors raised by the tuning harness
#[derive(Debug, Error)]
pub enum Error {
    /// Search space rejected at construction (duplicate name, empty range)
    #[error("invalid search space: {0}")]
    InvalidSearchSpace(String),

    /// Configuration violates the declared search space
    #[error("parameter {name} out of range: {value}")]
    OutOfRange { name: String, value: String },

    /// Every resampling fold failed for a configuration
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// Terminator rejected at setup (zero limit, empty combinator, ...)
    #[error("budget misconfigured: {0}")]
    BudgetMisconfigured(String),

    /// Outer test rows detected inside an inner training split
    #[error("resampling leakage: {0}")]
    Leakage(String),

    /// Invalid argument outside the search-space contract
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Archive bookkeeping failure
    #[error("archive error: {0}")]
    Archive(String),

    /// Archive persistence I/O failure
    #[error("archive I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Archive (de)serialization failure
    #[error("archive serialization: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, Error>;
