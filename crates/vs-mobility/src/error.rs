use thiserror::Error;
use vs_core::CoreError;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("invalid mobility configuration: {0}")]
    InvalidConfiguration(String),

    #[error("trace parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for MobilityError {
    fn from(e: CoreError) -> Self {
        MobilityError::InvalidConfiguration(e.to_string())
    }
}

pub type MobilityResult<T> = Result<T, MobilityError>;

/// Fail with `InvalidConfiguration` unless `speed` is finite and positive.
pub(crate) fn check_speed(speed: f64, what: &str) -> MobilityResult<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(MobilityError::InvalidConfiguration(format!(
            "{what} must be positive and finite, got {speed}"
        )))
    }
}

pub(crate) fn check_point(p: vs_core::Point, what: &str) -> MobilityResult<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(MobilityError::InvalidConfiguration(format!("{what} {p} is not finite")))
    }
}
