//! `EventQueue`: min-ordered pending events plus the simulated clock.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use vs_core::{EventId, SimTime};

use crate::event::Entry;
use crate::{Event, ScheduleError, ScheduleResult};

#[cfg(feature = "fx-hash")]
type IdSet = rustc_hash::FxHashSet<EventId>;
#[cfg(not(feature = "fx-hash"))]
type IdSet = std::collections::HashSet<EventId>;

/// Tombstones are compacted away once they outnumber live events by this
/// factor (and there are at least `COMPACT_MIN` of them).
const COMPACT_RATIO: usize = 2;
const COMPACT_MIN:   usize = 64;

/// Snapshot of the queue handed to stop conditions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QueueState {
    /// Current simulated time.
    pub now: SimTime,
    /// Number of live (not cancelled) events.
    pub pending: usize,
    /// Time of the earliest live event, if any.
    pub next_time: Option<SimTime>,
}

/// A priority queue of timed events that also owns "now".
///
/// `BinaryHeap<Reverse<_>>` gives O(log n) schedule and pop.  Cancellation
/// removes the id from a hash set in O(1); the heap entry is skipped when
/// it surfaces.
pub struct EventQueue<T> {
    heap:    BinaryHeap<Reverse<Entry<T>>>,
    /// Ids that are scheduled and neither popped nor cancelled.
    pending: IdSet,
    next_id: EventId,
    now:     SimTime,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::starting_at(SimTime::ZERO)
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty queue whose clock starts at `start`.
    pub fn starting_at(start: SimTime) -> Self {
        Self {
            heap:    BinaryHeap::new(),
            pending: IdSet::default(),
            next_id: EventId(0),
            now:     start,
        }
    }

    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `payload` to fire at `time`.
    ///
    /// Fails with [`ScheduleError::InvalidTime`] if `time` is earlier than
    /// [`now`](Self::now).  Scheduling at exactly `now` is allowed; the event
    /// fires after everything already queued for `now`.
    pub fn schedule(&mut self, time: SimTime, payload: T) -> ScheduleResult<EventId> {
        if time < self.now {
            return Err(ScheduleError::InvalidTime { requested: time, now: self.now });
        }
        let id = self.next_id;
        self.next_id = id.next();
        self.pending.insert(id);
        self.heap.push(Reverse(Entry(Event { id, time, payload })));
        Ok(id)
    }

    /// Schedule `payload` to fire `delay` seconds from now.
    pub fn schedule_in(&mut self, delay: f64, payload: T) -> ScheduleResult<EventId> {
        let time = self.now.after(delay)?;
        self.schedule(time, payload)
    }

    /// Mark `id` inert.  Returns `true` if it was pending.
    ///
    /// Cancelling an event that already fired, was already cancelled, or
    /// never existed is a harmless no-op.
    pub fn cancel(&mut self, id: EventId) -> bool {
        let was_pending = self.pending.remove(&id);
        if was_pending {
            self.maybe_compact();
        }
        was_pending
    }

    /// `true` if `id` is scheduled and has neither fired nor been cancelled.
    #[inline]
    pub fn is_pending(&self, id: EventId) -> bool {
        self.pending.contains(&id)
    }

    /// Remove and return the earliest live event, advancing the clock to its
    /// time.  Returns `None` once no live events remain.
    pub fn pop_next(&mut self) -> Option<Event<T>> {
        while let Some(Reverse(Entry(event))) = self.heap.pop() {
            if self.pending.remove(&event.id) {
                self.now = self.now.max(event.time);
                return Some(event);
            }
            log::trace!("skipping cancelled {} at {}", event.id, event.time);
        }
        None
    }

    /// The earliest live event without removing it.
    pub fn peek(&mut self) -> Option<&Event<T>> {
        self.discard_tombstones();
        self.heap.peek().map(|Reverse(Entry(event))| event)
    }

    /// Time of the earliest live event.
    pub fn peek_time(&mut self) -> Option<SimTime> {
        self.peek().map(|e| e.time)
    }

    /// Move the clock forward to `time` without dispatching anything.
    ///
    /// Events scheduled earlier than `time` stay queued; they will pop with
    /// their original timestamps and leave the clock where it is.
    pub fn advance_to(&mut self, time: SimTime) -> ScheduleResult<()> {
        if time < self.now {
            return Err(ScheduleError::InvalidTime { requested: time, now: self.now });
        }
        self.now = time;
        Ok(())
    }

    /// Number of live events.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Cancelled entries still occupying heap slots.
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.heap.len() - self.pending.len()
    }

    /// The id the next `schedule` call will return.
    #[inline]
    pub fn next_event_id(&self) -> EventId {
        self.next_id
    }

    pub fn state(&mut self) -> QueueState {
        QueueState {
            now:       self.now,
            pending:   self.len(),
            next_time: self.peek_time(),
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn discard_tombstones(&mut self) {
        while let Some(Reverse(Entry(top))) = self.heap.peek() {
            if self.pending.contains(&top.id) {
                break;
            }
            self.heap.pop();
        }
    }

    fn maybe_compact(&mut self) {
        let dead = self.tombstones();
        if dead < COMPACT_MIN || dead < self.pending.len() * COMPACT_RATIO {
            return;
        }
        let pending = &self.pending;
        let live: Vec<_> = std::mem::take(&mut self.heap)
            .into_iter()
            .filter(|Reverse(Entry(e))| pending.contains(&e.id))
            .collect();
        self.heap = BinaryHeap::from(live);
        log::trace!("compacted event queue: dropped {dead} tombstones");
    }
}
