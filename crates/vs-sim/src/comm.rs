//! Communication layer types: per-node transceivers, messages, and the
//! outcome of a send.
//!
//! The send path itself lives on [`Simulator`](crate::Simulator) because it
//! needs the channel, every node's position, and the event queue at once.

use std::collections::VecDeque;
use std::fmt;

use vs_core::{MessageId, NodeId, SimTime};

use crate::{SimError, SimResult};

// ── DeliveryPolicy ────────────────────────────────────────────────────────────

/// What a sender does with a unicast or multicast copy whose receiver is
/// unreachable at send time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DeliveryPolicy {
    /// Drop immediately and report [`DropReason::Unreachable`].
    #[default]
    DropIfUnreachable,
    /// Keep the copy in the sender's outbox and retry every
    /// `retry_interval` seconds.  Copies older than `ttl` seconds are
    /// dropped with [`DropReason::Expired`].
    BufferUntilReachable { ttl: f64, retry_interval: f64 },
}

impl DeliveryPolicy {
    pub fn validate(&self) -> SimResult<()> {
        match *self {
            DeliveryPolicy::DropIfUnreachable => Ok(()),
            DeliveryPolicy::BufferUntilReachable { ttl, retry_interval } => {
                if !(ttl.is_finite() && ttl >= 0.0) {
                    return Err(SimError::Config(format!("buffer ttl must be non-negative, got {ttl}")));
                }
                if !(retry_interval.is_finite() && retry_interval > 0.0) {
                    return Err(SimError::Config(format!(
                        "retry interval must be positive, got {retry_interval}"
                    )));
                }
                Ok(())
            }
        }
    }
}

// ── Transceiver ───────────────────────────────────────────────────────────────

/// A node's radio: the frequency it listens on, its delivery policy, and
/// the outbox of copies waiting for a route.
///
/// Two nodes can only hear each other on the same frequency.
#[derive(Debug, Clone, Default)]
pub struct Transceiver {
    frequency:         f64,
    policy:            DeliveryPolicy,
    pub(crate) outbox: VecDeque<Message>,
}

impl Transceiver {
    pub fn new(frequency: f64, policy: DeliveryPolicy) -> Self {
        Self { frequency, policy, outbox: VecDeque::new() }
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    #[inline]
    pub fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    /// Copies currently waiting for their receiver to become reachable.
    pub fn outbox(&self) -> impl Iterator<Item = &Message> {
        self.outbox.iter()
    }

    pub fn outbox_len(&self) -> usize {
        self.outbox.len()
    }

    #[inline]
    pub fn same_band(&self, other: &Transceiver) -> bool {
        self.frequency == other.frequency
    }
}

// ── Message ───────────────────────────────────────────────────────────────────

/// One copy of a sent message, addressed to a single receiver.
///
/// A broadcast or multicast produces one copy per receiver; they share the
/// same `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id:        MessageId,
    pub sender:    NodeId,
    pub receiver:  NodeId,
    pub payload:   Vec<u8>,
    pub send_time: SimTime,
    /// Channel quality at the moment the copy was put on the air; zero
    /// until then.
    pub quality:   f64,
}

// ── Recipient ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Unicast(NodeId),
    Multicast(Vec<NodeId>),
    /// Every node currently reachable from the sender.  Never buffered.
    Broadcast,
}

// ── Outcome reporting ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// The channel did not connect sender and receiver.
    Unreachable,
    /// The copy sat in an outbox longer than the policy's TTL.
    Expired,
    /// The receiver does not exist (never added, or removed before
    /// delivery).
    ReceiverRemoved,
    /// The sender was removed while the copy was still in its outbox.
    SenderRemoved,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DropReason::Unreachable => "unreachable",
            DropReason::Expired => "expired",
            DropReason::ReceiverRemoved => "receiver removed",
            DropReason::SenderRemoved => "sender removed",
        };
        f.write_str(s)
    }
}

/// What happened to each copy of one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    pub message:   MessageId,
    /// Receivers with a delivery event in the queue.
    pub scheduled: Vec<NodeId>,
    /// Receivers whose copy went to the sender's outbox.
    pub buffered:  Vec<NodeId>,
    /// Receivers whose copy was dropped.
    pub dropped:   Vec<NodeId>,
}

impl SendReport {
    pub(crate) fn new(message: MessageId) -> Self {
        Self {
            message,
            scheduled: Vec::new(),
            buffered:  Vec::new(),
            dropped:   Vec::new(),
        }
    }
}
