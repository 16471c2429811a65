//! Core error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! into them via `From` or keep it as one variant.

use thiserror::Error;

/// Errors raised while constructing core values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid simulated time {0}: must be finite and non-negative")]
    InvalidTime(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Shorthand result type for `vs-core`.
pub type CoreResult<T> = Result<T, CoreError>;
