//! `vs-schedule`: the event queue and simulated clock.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`event`]  | `Event<T>`: a payload stamped with time and sequence id    |
//! | [`queue`]  | `EventQueue<T>`, `QueueState`                              |
//! | [`error`]  | `ScheduleError`, `ScheduleResult<T>`                       |
//!
//! # Ordering law
//!
//! Events pop in ascending `(time, id)` order.  `EventId`s are minted in
//! strictly increasing order at schedule time, so two events scheduled for
//! the same instant pop in the order they were scheduled.  The queue is the
//! only thing that moves the clock, and it only moves it forward.
//!
//! # Cancellation
//!
//! `cancel` is O(1): the id leaves the pending set and the heap entry stays
//! behind as a tombstone, discarded when it reaches the top.

pub mod error;
pub mod event;
pub mod queue;


pub use error::{ScheduleError, ScheduleResult};
pub use event::Event;
pub use queue::{EventQueue, QueueState};
