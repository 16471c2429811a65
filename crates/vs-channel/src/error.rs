//! Channel error type.

use thiserror::Error;

/// Errors produced by `vs-channel`.  All of them surface at construction;
/// evaluating a channel never fails.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChannelError {
    #[error("invalid channel configuration: {0}")]
    InvalidConfiguration(String),
}

pub type ChannelResult<T> = Result<T, ChannelError>;

pub(crate) fn check_positive(value: f64, what: &str) -> ChannelResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ChannelError::InvalidConfiguration(format!(
            "{what} must be positive and finite, got {value}"
        )))
    }
}

pub(crate) fn check_non_negative(value: f64, what: &str) -> ChannelResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ChannelError::InvalidConfiguration(format!(
            "{what} must be non-negative and finite, got {value}"
        )))
    }
}
