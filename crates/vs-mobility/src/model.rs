//! The `MobilityModel` trait: the extension point for movement behaviour.

use std::any::Any;
use std::fmt::Debug;

use vs_core::{Heading, NodeRng, Point, SimTime};

/// Pluggable node movement.
///
/// The simulator owns one boxed model per node and drives it through two
/// calls:
///
/// 1. [`initial_schedule`](Self::initial_schedule) once, when the node is
///    added (or the model is swapped in).  The returned time is enqueued as
///    the node's first update event.
/// 2. [`on_update`](Self::on_update) each time that event fires.  The model
///    performs its state transition and returns the time of the next update,
///    or `None` when it has nothing more to do.
///
/// Between updates, [`position_at`](Self::position_at) must be a pure
/// function of `now`.  It is only ever called with `now` at or after the
/// most recent update.
///
/// Configuration errors belong in the model's constructor: once a model
/// exists it must not fail mid-run.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug)]
/// struct Orbit { centre: Point, radius: f64, period: f64 }
///
/// impl MobilityModel for Orbit {
///     fn position_at(&self, now: SimTime) -> Point {
///         let a = std::f64::consts::TAU * now.as_secs() / self.period;
///         Point::new(self.centre.x + self.radius * a.cos(), self.centre.y + self.radius * a.sin())
///     }
///     fn heading_at(&self, _now: SimTime) -> Heading { Heading::NORTH }
///     fn initial_schedule(&mut self, _now: SimTime) -> Option<SimTime> { None }
///     fn on_update(&mut self, _now: SimTime, _rng: &mut NodeRng) -> Option<SimTime> { None }
/// }
/// ```
pub trait MobilityModel: Debug + AsAny {
    /// Position of the node at `now`.
    fn position_at(&self, now: SimTime) -> Point;

    /// Direction the node is facing at `now`.
    fn heading_at(&self, now: SimTime) -> Heading;

    /// Prepare the model to start at `now`; return the first update time.
    fn initial_schedule(&mut self, now: SimTime) -> Option<SimTime>;

    /// Handle the update due at `now`; return the next update time.
    ///
    /// `rng` is the owning node's deterministic RNG.
    fn on_update(&mut self, now: SimTime, rng: &mut NodeRng) -> Option<SimTime>;

    /// `true` once the trajectory has ended for good.
    ///
    /// The simulator reports a mobility-end notification when `on_update`
    /// returns `None` and this is `true`.
    fn is_finished(&self) -> bool {
        false
    }

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Downcasting support so a simulator can hand a boxed model back to code
/// that knows its concrete type.  Implemented for every `'static` type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
