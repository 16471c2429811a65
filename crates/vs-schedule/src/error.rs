use thiserror::Error;
use vs_core::{CoreError, SimTime};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("cannot schedule at {requested}: simulated time is already {now}")]
    InvalidTime {
        requested: SimTime,
        now:       SimTime,
    },

    #[error("invalid delay: {0}")]
    InvalidDelay(#[from] CoreError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
