use thiserror::Error;

use vs_channel::ChannelError;
use vs_core::{CoreError, EventId, HandlerId, NodeId, SimTime};
use vs_mobility::MobilityError;
use vs_schedule::ScheduleError;

/// Error returned by a user event handler or receive hook.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// What a user event handler or receive hook returns.
pub type HandlerResult = Result<(), HandlerError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    InvalidTime(#[from] ScheduleError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),

    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("node {0} already exists")]
    DuplicateNode(NodeId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("no handler registered as {0}")]
    UnknownHandler(HandlerId),

    #[error("{node} does not use a {expected} mobility model")]
    ModelMismatch { node: NodeId, expected: &'static str },

    /// A user handler failed.  The run stopped with the clock at `time` and
    /// every other queued event intact.
    #[error("handler for {event} failed at {time}: {source}")]
    Handler {
        event:  EventId,
        time:   SimTime,
        #[source]
        source: HandlerError,
    },
}

impl From<CoreError> for SimError {
    fn from(e: CoreError) -> Self {
        SimError::Config(e.to_string())
    }
}

pub type SimResult<T> = Result<T, SimError>;
