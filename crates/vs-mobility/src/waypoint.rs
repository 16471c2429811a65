//! Random-waypoint mobility.

use vs_core::{Area, Heading, NodeRng, Point, SimTime};

use crate::error::{MobilityError, MobilityResult, check_point, check_speed};
use crate::leg::{Leg, later};
use crate::MobilityModel;

/// Parameters for [`RandomWaypoint`].
///
/// Speeds are in scenario length units per second, pauses in seconds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RandomWaypointConfig {
    pub area:      Area,
    pub min_speed: f64,
    pub max_speed: f64,
    #[serde(default)]
    pub min_pause: f64,
    #[serde(default)]
    pub max_pause: f64,
}

impl RandomWaypointConfig {
    pub fn validate(&self) -> MobilityResult<()> {
        if !self.area.is_valid() {
            return Err(MobilityError::InvalidConfiguration(format!(
                "random waypoint area {:?} is degenerate",
                self.area
            )));
        }
        check_speed(self.min_speed, "min_speed")?;
        check_speed(self.max_speed, "max_speed")?;
        if self.min_speed > self.max_speed {
            return Err(MobilityError::InvalidConfiguration(format!(
                "min_speed {} exceeds max_speed {}",
                self.min_speed, self.max_speed
            )));
        }
        let pauses_ok = self.min_pause.is_finite()
            && self.max_pause.is_finite()
            && self.min_pause >= 0.0
            && self.min_pause <= self.max_pause;
        if !pauses_ok {
            return Err(MobilityError::InvalidConfiguration(format!(
                "pause range [{}, {}] must be finite, non-negative and ordered",
                self.min_pause, self.max_pause
            )));
        }
        Ok(())
    }
}

/// Where a [`RandomWaypoint`] node is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaypointState {
    /// Parked at `at` (initially, or pausing after an arrival); the next
    /// update draws a new destination.
    ChoosingDestination { at: Point, heading: Heading },
    /// Travelling along a leg.
    Moving(Leg),
}

/// The classic random-waypoint model: pick a uniform destination inside
/// `area` and a uniform speed, travel there, pause, repeat.
///
/// All draws come from the owning node's RNG, so a trajectory depends only
/// on the run seed and the node's ID.
#[derive(Debug, Clone)]
pub struct RandomWaypoint {
    config: RandomWaypointConfig,
    state:  WaypointState,
}

impl RandomWaypoint {
    pub fn new(start: Point, config: RandomWaypointConfig) -> MobilityResult<Self> {
        config.validate()?;
        check_point(start, "random waypoint start")?;
        Ok(Self {
            config,
            state: WaypointState::ChoosingDestination { at: start, heading: Heading::NORTH },
        })
    }

    #[inline]
    pub fn state(&self) -> &WaypointState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &RandomWaypointConfig {
        &self.config
    }

    fn choose(&mut self, from: Point, heading: Heading, now: SimTime, rng: &mut NodeRng) -> SimTime {
        let a = &self.config.area;
        let dest = Point::new_3d(
            rng.uniform(a.min_x, a.max_x),
            rng.uniform(a.min_y, a.max_y),
            from.z,
        );
        let speed = rng.uniform(self.config.min_speed, self.config.max_speed);
        let leg = Leg::between(from, dest, now, speed, heading);
        self.state = WaypointState::Moving(leg);
        leg.arrive
    }
}

impl MobilityModel for RandomWaypoint {
    fn position_at(&self, now: SimTime) -> Point {
        match &self.state {
            WaypointState::ChoosingDestination { at, .. } => *at,
            WaypointState::Moving(leg) => leg.position_at(now),
        }
    }

    fn heading_at(&self, _now: SimTime) -> Heading {
        match &self.state {
            WaypointState::ChoosingDestination { heading, .. } => *heading,
            WaypointState::Moving(leg) => leg.heading,
        }
    }

    fn initial_schedule(&mut self, now: SimTime) -> Option<SimTime> {
        // Swapped in mid-leg: freeze where we are and choose afresh.
        if let WaypointState::Moving(leg) = self.state {
            self.state = WaypointState::ChoosingDestination {
                at:      leg.position_at(now),
                heading: leg.heading,
            };
        }
        Some(now)
    }

    fn on_update(&mut self, now: SimTime, rng: &mut NodeRng) -> Option<SimTime> {
        match self.state {
            WaypointState::ChoosingDestination { at, heading } => {
                Some(self.choose(at, heading, now, rng))
            }
            WaypointState::Moving(leg) => {
                if !leg.has_arrived(now) {
                    return Some(leg.arrive);
                }
                let pause = rng.uniform(self.config.min_pause, self.config.max_pause);
                self.state = WaypointState::ChoosingDestination { at: leg.to, heading: leg.heading };
                Some(later(now, pause))
            }
        }
    }

    fn name(&self) -> &'static str {
        "random_waypoint"
    }
}
