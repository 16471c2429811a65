//! Fluent builder for constructing a [`Simulator`].

use vs_channel::{ChannelModel, PropagationDelay};
use vs_core::SimConfig;

use crate::{NodeSpec, SimObserver, SimResult, Simulator};

/// Fluent builder for [`Simulator<C>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: start/stop time, mobility tick, seed
/// - `C: ChannelModel`: the channel (e.g. [`vs_channel::DistanceThreshold`])
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                  |
/// |---------------------------|--------------------------|
/// | `.propagation_delay(d)`   | `PropagationDelay::Zero` |
/// | `.observer(o)`            | none                     |
/// | `.node(spec)`             | no nodes                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, DistanceThreshold::new(250.0)?)
///     .propagation_delay(PropagationDelay::constant(0.002)?)
///     .node(NodeSpec::fixed(NodeId(0), Point::ORIGIN)?.kind(NodeKind::BaseStation))
///     .observer(Tracer::default())
///     .build()?;
/// sim.run()?;
/// ```
pub struct SimBuilder<C: ChannelModel> {
    config:    SimConfig,
    channel:   C,
    delay:     PropagationDelay,
    observers: Vec<Box<dyn SimObserver>>,
    nodes:     Vec<NodeSpec>,
}

impl<C: ChannelModel> SimBuilder<C> {
    pub fn new(config: SimConfig, channel: C) -> Self {
        Self {
            config,
            channel,
            delay:     PropagationDelay::default(),
            observers: Vec::new(),
            nodes:     Vec::new(),
        }
    }

    pub fn propagation_delay(mut self, delay: PropagationDelay) -> Self {
        self.delay = delay;
        self
    }

    pub fn observer(mut self, observer: impl SimObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Queue a node to be added at the start time, in call order.
    pub fn node(mut self, spec: NodeSpec) -> Self {
        self.nodes.push(spec);
        self
    }

    /// Validate the configuration, add the nodes, and return a ready-to-run
    /// [`Simulator`].
    pub fn build(self) -> SimResult<Simulator<C>> {
        let mut sim = Simulator::from_parts(self.config, self.channel, self.delay, self.observers)?;
        for spec in self.nodes {
            sim.add_node(spec)?;
        }
        Ok(sim)
    }
}
