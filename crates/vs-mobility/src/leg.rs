//! One straight-line, constant-speed movement.

use vs_core::{Heading, Point, SimTime};

/// Distance below which a node counts as having reached its destination.
pub const ARRIVAL_EPSILON: f64 = 1e-9;

/// Straight-line movement from `from` to `to` between `depart` and `arrive`.
///
/// A leg with `from == to` and `depart == arrive` is a stationary leg: the
/// node sits at `from` from `depart` onwards.  Models keep a stationary leg
/// while paused or finished so `position_at` never needs a special case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub from:    Point,
    pub to:      Point,
    pub depart:  SimTime,
    pub arrive:  SimTime,
    /// Direction of travel.  Stationary legs carry the previous heading.
    pub heading: Heading,
}

impl Leg {
    /// A node parked at `at` from `since` onwards.
    pub fn stationary(at: Point, since: SimTime, heading: Heading) -> Self {
        Self { from: at, to: at, depart: since, arrive: since, heading }
    }

    /// Travel from `from` to `to` starting at `depart` with `speed`.
    ///
    /// `speed` must already be validated as positive.  Zero-length legs
    /// arrive immediately and keep `prev_heading`.
    pub fn between(from: Point, to: Point, depart: SimTime, speed: f64, prev_heading: Heading) -> Self {
        let distance = from.distance_to(to);
        if distance <= ARRIVAL_EPSILON {
            return Self::stationary(to, depart, prev_heading);
        }
        Self {
            from,
            to,
            depart,
            arrive:  later(depart, distance / speed),
            heading: from.azimuth_to(to),
        }
    }

    /// `true` while the leg covers a non-zero distance.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.arrive > self.depart
    }

    /// Fraction of the leg completed at `now`, in `[0, 1]`.
    ///
    /// Returns `1.0` for stationary legs or once `now >= arrive`.
    pub fn progress(&self, now: SimTime) -> f64 {
        if !self.is_moving() {
            return 1.0;
        }
        let total = self.arrive.since(self.depart);
        (now.since(self.depart) / total).min(1.0)
    }

    /// Interpolated position at `now`.
    #[inline]
    pub fn position_at(&self, now: SimTime) -> Point {
        self.from.lerp(self.to, self.progress(now))
    }

    /// `true` once `now` has reached the arrival time or the interpolated
    /// position is within [`ARRIVAL_EPSILON`] of `to`.
    pub fn has_arrived(&self, now: SimTime) -> bool {
        now >= self.arrive || self.position_at(now).distance_to(self.to) <= ARRIVAL_EPSILON
    }
}

/// `now + secs`, saturating at [`SimTime::MAX`] when the sum is not
/// representable.  `secs` is expected to be validated non-negative.
#[inline]
pub(crate) fn later(now: SimTime, secs: f64) -> SimTime {
    now.after(secs).unwrap_or(SimTime::MAX)
}
