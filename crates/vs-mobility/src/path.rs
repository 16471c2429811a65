//! Scripted movement along a fixed list of waypoints.

use vs_core::{Heading, NodeRng, Point, SimTime};

use crate::error::{MobilityResult, check_point, check_speed};
use crate::leg::Leg;
use crate::MobilityModel;

/// Moves from a start point through `(speed, waypoint)` pairs in order, then
/// stays at the last waypoint.
///
/// Each pair is one leg: travel to `waypoint` at `speed`.  A waypoint equal
/// to the current position is a zero-length leg and completes immediately.
#[derive(Debug, Clone)]
pub struct FixedPath {
    start:     Point,
    waypoints: Vec<(f64, Point)>,
    /// Index of the next waypoint to depart towards.
    cursor:    usize,
    leg:       Leg,
    started:   bool,
}

impl FixedPath {
    pub fn new(start: Point) -> MobilityResult<Self> {
        check_point(start, "path start")?;
        Ok(Self {
            start,
            waypoints: Vec::new(),
            cursor:    0,
            leg:       Leg::stationary(start, SimTime::ZERO, Heading::NORTH),
            started:   false,
        })
    }

    /// Build a path from a start point and its legs in one go.
    pub fn with_waypoints(
        start: Point,
        waypoints: impl IntoIterator<Item = (f64, Point)>,
    ) -> MobilityResult<Self> {
        let mut path = Self::new(start)?;
        for (speed, to) in waypoints {
            path.push_waypoint(speed, to)?;
        }
        Ok(path)
    }

    /// Append a leg to the end of the path.
    ///
    /// Appending to a path that already finished does not resume it; call
    /// [`restart`](Self::restart) or swap the model back in.
    pub fn push_waypoint(&mut self, speed: f64, to: Point) -> MobilityResult<()> {
        check_speed(speed, "path speed")?;
        check_point(to, "waypoint")?;
        self.waypoints.push((speed, to));
        Ok(())
    }

    /// Rewind to the start point so the next `initial_schedule` replays the
    /// whole path.
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.started = false;
        self.leg = Leg::stationary(self.start, SimTime::ZERO, Heading::NORTH);
    }

    /// Forget every remaining leg and head from the position at `now` to
    /// `to` at `speed`.
    ///
    /// The new path takes effect at the next `initial_schedule`, which the
    /// simulator calls after `Simulator::reconfigure_mobility`.
    pub fn reset_path(&mut self, now: SimTime, speed: f64, to: Point) -> MobilityResult<()> {
        check_speed(speed, "path speed")?;
        check_point(to, "waypoint")?;
        let here = self.position_at(now);
        self.start = here;
        self.waypoints.clear();
        self.waypoints.push((speed, to));
        self.cursor = 0;
        self.started = false;
        self.leg = Leg::stationary(here, now, self.leg.heading);
        Ok(())
    }

    pub fn waypoints(&self) -> &[(f64, Point)] {
        &self.waypoints
    }

    /// The leg currently being travelled (stationary once finished).
    pub fn current_leg(&self) -> &Leg {
        &self.leg
    }

    /// Start the next non-empty leg at `now`, skipping zero-length ones.
    fn depart(&mut self, now: SimTime) -> Option<SimTime> {
        let here = self.leg.position_at(now);
        let heading = self.leg.heading;
        while let Some(&(speed, to)) = self.waypoints.get(self.cursor) {
            self.cursor += 1;
            let leg = Leg::between(here, to, now, speed, heading);
            if leg.is_moving() {
                self.leg = leg;
                return Some(leg.arrive);
            }
        }
        let end = self.waypoints.last().map_or(here, |&(_, p)| p);
        self.leg = Leg::stationary(end, now, heading);
        None
    }
}

impl MobilityModel for FixedPath {
    fn position_at(&self, now: SimTime) -> Point {
        if !self.started {
            return self.start;
        }
        self.leg.position_at(now)
    }

    fn heading_at(&self, _now: SimTime) -> Heading {
        self.leg.heading
    }

    fn initial_schedule(&mut self, now: SimTime) -> Option<SimTime> {
        self.started = true;
        self.leg = Leg::stationary(self.leg.position_at(now), now, self.leg.heading);
        self.depart(now)
    }

    fn on_update(&mut self, now: SimTime, _rng: &mut NodeRng) -> Option<SimTime> {
        // Early or duplicate wake-ups: keep travelling.
        if !self.leg.has_arrived(now) {
            return Some(self.leg.arrive);
        }
        self.leg = Leg::stationary(self.leg.to, now, self.leg.heading);
        self.depart(now)
    }

    fn is_finished(&self) -> bool {
        self.started && self.cursor >= self.waypoints.len() && !self.leg.is_moving()
    }

    fn name(&self) -> &'static str {
        "fixed_path"
    }
}
