//! A scheduled event.

use std::cmp::Ordering;

use vs_core::{EventId, SimTime};

/// A payload stamped with the time it fires and its sequence id.
///
/// The queue owns an `Event` until [`pop_next`](crate::EventQueue::pop_next)
/// hands it to the caller for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<T> {
    /// Sequence id, assigned at schedule time.  Breaks ties between events
    /// with equal `time`.
    pub id: EventId,

    /// Simulated time at which the event fires.
    pub time: SimTime,

    pub payload: T,
}

impl<T> Event<T> {
    /// Ordering key: earliest time first, then earliest scheduled.
    #[inline]
    pub fn key(&self) -> (SimTime, EventId) {
        (self.time, self.id)
    }
}

/// Heap entry ordered by `(time, id)` only; the payload never takes part in
/// comparisons.
#[derive(Debug)]
pub(crate) struct Entry<T>(pub(crate) Event<T>);

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.key() == other.0.key()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.key().cmp(&other.0.key())
    }
}
