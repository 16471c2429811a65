use vs_core::SimTime;

use crate::error::{ChannelResult, check_positive};
use crate::{ChannelModel, Endpoint};

/// Omnidirectional disc: two nodes are connected iff they are at most
/// `radius` apart.
///
/// Quality falls linearly from 1 at zero distance to 0 at the edge.  A node
/// exactly on the edge is still connected, with quality 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceThreshold {
    radius: f64,
}

impl DistanceThreshold {
    pub fn new(radius: f64) -> ChannelResult<Self> {
        check_positive(radius, "radius")?;
        Ok(Self { radius })
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl ChannelModel for DistanceThreshold {
    fn connected(&self, from: &Endpoint, to: &Endpoint, _now: SimTime) -> bool {
        from.distance_to(to) <= self.radius
    }

    fn quality(&self, from: &Endpoint, to: &Endpoint, _now: SimTime) -> f64 {
        let d = from.distance_to(to);
        if d > self.radius { 0.0 } else { 1.0 - d / self.radius }
    }

    fn max_range(&self) -> Option<f64> {
        Some(self.radius)
    }

    fn name(&self) -> &'static str {
        "distance_threshold"
    }
}
