//! The command carried by every queued event.

use vs_core::{HandlerId, NodeId};

use crate::comm::Message;

/// What a queued event does when it fires.
///
/// Events are plain data: user code is referenced by [`HandlerId`], never
/// captured in the queue, so pending events can be inspected and logged.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Call a registered user handler with `payload`.
    User { handler: HandlerId, payload: Vec<u8> },
    /// Advance a node's mobility model.
    MobilityUpdate(NodeId),
    /// Report a model that was already finished when it started.
    MobilityEnd(NodeId),
    /// Hand a message copy to its receiver.
    Deliver(Message),
    /// Re-evaluate a node's outbox.
    RetryBuffered(NodeId),
    /// Report every node's position to observers.
    MobilityTick,
}

impl EventKind {
    /// Short label for logs and observers.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::User { .. } => "user",
            EventKind::MobilityUpdate(_) => "mobility_update",
            EventKind::MobilityEnd(_) => "mobility_end",
            EventKind::Deliver(_) => "deliver",
            EventKind::RetryBuffered(_) => "retry_buffered",
            EventKind::MobilityTick => "mobility_tick",
        }
    }
}
