//! Cartesian coordinates, headings, and rectangular areas.
//!
//! The simulated world is flat.  `Point` carries an optional third axis
//! (`z`, zero for ground vehicles) so drones and elevated base stations can
//! share the same distance function.  Distances are in the scenario's own
//! length unit; the engine never assumes metres.

use std::fmt;

// ── Point ─────────────────────────────────────────────────────────────────────

/// A position in the simulated world.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub z: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0, z: 0.0 };

    /// A ground-level point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    #[inline]
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// The point `fraction` of the way from `self` to `other`.
    ///
    /// `fraction` is clamped to `[0, 1]`: 0 yields `self`, 1 yields `other`.
    pub fn lerp(self, other: Point, fraction: f64) -> Point {
        let f = fraction.clamp(0.0, 1.0);
        Point {
            x: self.x + (other.x - self.x) * f,
            y: self.y + (other.y - self.y) * f,
            z: self.z + (other.z - self.z) * f,
        }
    }

    /// Compass bearing from `self` to `other` in the x/y plane.
    ///
    /// North is +y and angles grow clockwise, so +x is 90°.  Returns north
    /// when the two points coincide.
    pub fn azimuth_to(self, other: Point) -> Heading {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        if dx == 0.0 && dy == 0.0 {
            return Heading::NORTH;
        }
        Heading::from_degrees(90.0 - dy.atan2(dx).to_degrees())
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.z == 0.0 {
            write!(f, "({:.2}, {:.2})", self.x, self.y)
        } else {
            write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
        }
    }
}

// ── Heading ───────────────────────────────────────────────────────────────────

/// A compass direction in degrees, normalised to `[0, 360)`.
///
/// 0° points north (+y); angles increase clockwise.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heading(f64);

impl Heading {
    pub const NORTH: Heading = Heading(0.0);

    /// Wrap any finite angle into `[0, 360)`.
    pub fn from_degrees(deg: f64) -> Self {
        let d = deg.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negatives.
        Heading(if d >= 360.0 { 0.0 } else { d })
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Signed clockwise offset from `self` to `other`, in `(-180, 180]`.
    pub fn offset_to(self, other: Heading) -> f64 {
        let d = (other.0 - self.0).rem_euclid(360.0);
        if d > 180.0 { d - 360.0 } else { d }
    }

    /// `true` if `other` lies within `±half_width` degrees of `self`.
    #[inline]
    pub fn is_within(self, other: Heading, half_width: f64) -> bool {
        self.offset_to(other).abs() <= half_width
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

// ── Area ──────────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle on the ground plane.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Area {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `true` if the bounds are finite and the rectangle has positive size.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.width() > 0.0
            && self.height() > 0.0
    }

    /// Inclusive containment test on x/y; `z` is ignored.
    pub fn contains(&self, p: Point) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }
}
