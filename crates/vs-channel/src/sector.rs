//! Directional antenna: a disc restricted to a beam.

use vs_core::{Heading, SimTime};

use crate::error::{ChannelError, ChannelResult, check_positive};
use crate::{ChannelModel, Endpoint, Symmetry};

/// Reachable iff within `radius` of the sender and inside the sender's beam.
///
/// The beam is centred on `azimuth` (degrees clockwise from north) and spans
/// `beam_width` degrees; 360 is omnidirectional.  With `follow_heading`, the
/// azimuth is an offset from the sender's current heading instead of an
/// absolute bearing.
///
/// Only the sender's beam matters, so the relation is [`Symmetry::Directed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    radius:         f64,
    beam_width:     f64,
    azimuth:        Heading,
    follow_heading: bool,
}

impl Sector {
    pub fn new(radius: f64, beam_width: f64, azimuth_deg: f64) -> ChannelResult<Self> {
        check_positive(radius, "radius")?;
        if !(beam_width.is_finite() && beam_width > 0.0 && beam_width <= 360.0) {
            return Err(ChannelError::InvalidConfiguration(format!(
                "beam width must be in (0, 360] degrees, got {beam_width}"
            )));
        }
        if !azimuth_deg.is_finite() {
            return Err(ChannelError::InvalidConfiguration(format!(
                "azimuth must be finite, got {azimuth_deg}"
            )));
        }
        Ok(Self {
            radius,
            beam_width,
            azimuth: Heading::from_degrees(azimuth_deg),
            follow_heading: false,
        })
    }

    /// Rotate the beam with the sender: `azimuth` becomes relative to the
    /// sender's heading.
    pub fn following_heading(mut self) -> Self {
        self.follow_heading = true;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn beam_width(&self) -> f64 {
        self.beam_width
    }

    /// Beam centre for a sender facing `heading`.
    fn boresight(&self, heading: Heading) -> Heading {
        if self.follow_heading {
            Heading::from_degrees(heading.degrees() + self.azimuth.degrees())
        } else {
            self.azimuth
        }
    }

    fn in_beam(&self, from: &Endpoint, to: &Endpoint) -> bool {
        // Co-located nodes have no bearing; treat them as inside.
        if self.beam_width >= 360.0 || from.distance_to(to) == 0.0 {
            return true;
        }
        let bearing = from.position.azimuth_to(to.position);
        self.boresight(from.heading).is_within(bearing, self.beam_width / 2.0)
    }
}

impl ChannelModel for Sector {
    fn connected(&self, from: &Endpoint, to: &Endpoint, _now: SimTime) -> bool {
        from.distance_to(to) <= self.radius && self.in_beam(from, to)
    }

    fn quality(&self, from: &Endpoint, to: &Endpoint, now: SimTime) -> f64 {
        if !self.connected(from, to, now) {
            return 0.0;
        }
        1.0 - from.distance_to(to) / self.radius
    }

    fn symmetry(&self) -> Symmetry {
        Symmetry::Directed
    }

    fn max_range(&self) -> Option<f64> {
        Some(self.radius)
    }

    fn name(&self) -> &'static str {
        "sector"
    }
}
