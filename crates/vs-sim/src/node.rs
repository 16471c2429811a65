//! Simulated nodes.

use vs_channel::Endpoint;
use vs_core::{EventId, Heading, NodeId, NodeKind, NodeRng, Point, SimTime};
use vs_mobility::{MobilityModel, Static};

use crate::comm::{DeliveryPolicy, Transceiver};

/// Everything needed to add a node to a simulator.
///
/// ```rust,ignore
/// let spec = NodeSpec::new(NodeId(7), RandomWaypoint::new(start, cfg)?)
///     .kind(NodeKind::Vehicle)
///     .frequency(5.9e9)
///     .policy(DeliveryPolicy::BufferUntilReachable { ttl: 30.0, retry_interval: 1.0 });
/// sim.add_node(spec)?;
/// ```
#[derive(Debug)]
pub struct NodeSpec {
    pub(crate) id:        NodeId,
    pub(crate) kind:      NodeKind,
    pub(crate) mobility:  Box<dyn MobilityModel>,
    pub(crate) frequency: f64,
    pub(crate) policy:    DeliveryPolicy,
}

impl NodeSpec {
    pub fn new(id: NodeId, mobility: impl MobilityModel + 'static) -> Self {
        Self::boxed(id, Box::new(mobility))
    }

    pub fn boxed(id: NodeId, mobility: Box<dyn MobilityModel>) -> Self {
        Self {
            id,
            kind: NodeKind::default(),
            mobility,
            frequency: 0.0,
            policy: DeliveryPolicy::default(),
        }
    }

    /// A node fixed at `position`.
    pub fn fixed(id: NodeId, position: Point) -> crate::SimResult<Self> {
        Ok(Self::new(id, Static::new(position)?))
    }

    pub fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn policy(mut self, policy: DeliveryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// A node inside a running simulator.
#[derive(Debug)]
pub struct Node {
    id:                        NodeId,
    kind:                      NodeKind,
    pub(crate) mobility:       Box<dyn MobilityModel>,
    pub(crate) rng:            NodeRng,
    pub(crate) transceiver:    Transceiver,
    /// The queued mobility update, if any.
    pub(crate) pending_update: Option<EventId>,
    /// The queued outbox retry, if any.
    pub(crate) pending_retry:  Option<EventId>,
    /// Distinguishes a re-added node from an earlier one with the same id.
    pub(crate) incarnation:    u64,
}

impl Node {
    pub(crate) fn from_spec(spec: NodeSpec, seed: u64, incarnation: u64) -> Self {
        Self {
            id:             spec.id,
            kind:           spec.kind,
            mobility:       spec.mobility,
            rng:            NodeRng::new(seed, spec.id),
            transceiver:    Transceiver::new(spec.frequency, spec.policy),
            pending_update: None,
            pending_retry:  None,
            incarnation,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn position_at(&self, now: SimTime) -> Point {
        self.mobility.position_at(now)
    }

    #[inline]
    pub fn heading_at(&self, now: SimTime) -> Heading {
        self.mobility.heading_at(now)
    }

    pub fn mobility(&self) -> &dyn MobilityModel {
        self.mobility.as_ref()
    }

    pub fn transceiver(&self) -> &Transceiver {
        &self.transceiver
    }

    /// `true` while a mobility update (or end report) is queued for this node.
    pub fn has_pending_update(&self) -> bool {
        self.pending_update.is_some()
    }

    /// The node as a channel model sees it at `now`.
    pub fn endpoint(&self, now: SimTime) -> Endpoint {
        Endpoint::new(self.id, self.position_at(now), self.heading_at(now))
    }
}
