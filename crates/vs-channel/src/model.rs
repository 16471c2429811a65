//! The `ChannelModel` trait.

use std::fmt::Debug;

use vs_core::{Heading, NodeId, Point, SimTime};

/// One side of a link, as seen by a channel model at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub id:       NodeId,
    pub position: Point,
    pub heading:  Heading,
}

impl Endpoint {
    pub fn new(id: NodeId, position: Point, heading: Heading) -> Self {
        Self { id, position, heading }
    }

    #[inline]
    pub fn distance_to(&self, other: &Endpoint) -> f64 {
        self.position.distance_to(other.position)
    }
}

/// Whether a model's reachability relation is symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Symmetry {
    /// `connected(a, b, t) == connected(b, a, t)` for all inputs.
    #[default]
    Symmetric,
    /// Links may exist in one direction only.
    Directed,
}

/// Decides whether a transmission from one endpoint reaches another.
///
/// Implementations must be deterministic functions of their inputs: the
/// simulator may ask the same question several times at one instant (once
/// for a neighbour query, again when sending) and expects the same answer.
pub trait ChannelModel: Debug {
    /// `true` if a transmission from `from` reaches `to` at `now`.
    fn connected(&self, from: &Endpoint, to: &Endpoint, now: SimTime) -> bool;

    /// Link quality in `[0, 1]` at `now`.
    ///
    /// Defaults to 1 when connected and 0 otherwise.
    fn quality(&self, from: &Endpoint, to: &Endpoint, now: SimTime) -> f64 {
        if self.connected(from, to, now) { 1.0 } else { 0.0 }
    }

    fn symmetry(&self) -> Symmetry {
        Symmetry::Symmetric
    }

    /// Distance beyond which `connected` is always `false`, if bounded.
    ///
    /// Lets the simulator prune broadcast candidates with a range query
    /// instead of testing every node.
    fn max_range(&self) -> Option<f64> {
        None
    }

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

impl<C: ChannelModel + ?Sized> ChannelModel for Box<C> {
    fn connected(&self, from: &Endpoint, to: &Endpoint, now: SimTime) -> bool {
        (**self).connected(from, to, now)
    }

    fn quality(&self, from: &Endpoint, to: &Endpoint, now: SimTime) -> f64 {
        (**self).quality(from, to, now)
    }

    fn symmetry(&self) -> Symmetry {
        (**self).symmetry()
    }

    fn max_range(&self) -> Option<f64> {
        (**self).max_range()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
