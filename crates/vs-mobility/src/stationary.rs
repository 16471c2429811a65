use vs_core::{Heading, NodeRng, Point, SimTime};

use crate::error::{MobilityResult, check_point};
use crate::MobilityModel;

/// A node that never moves: base stations, parked vehicles, hovering drones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Static {
    position: Point,
    heading:  Heading,
}

impl Static {
    pub fn new(position: Point) -> MobilityResult<Self> {
        Self::facing(position, Heading::NORTH)
    }

    /// A fixed node pointing in `heading` (relevant for sector antennas).
    pub fn facing(position: Point, heading: Heading) -> MobilityResult<Self> {
        check_point(position, "static position")?;
        Ok(Self { position, heading })
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }
}

impl MobilityModel for Static {
    fn position_at(&self, _now: SimTime) -> Point {
        self.position
    }

    fn heading_at(&self, _now: SimTime) -> Heading {
        self.heading
    }

    fn initial_schedule(&mut self, _now: SimTime) -> Option<SimTime> {
        None
    }

    fn on_update(&mut self, _now: SimTime, _rng: &mut NodeRng) -> Option<SimTime> {
        None
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
