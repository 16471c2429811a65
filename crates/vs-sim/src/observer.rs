//! Simulation observer trait for visualisation, tracing, and statistics.

use vs_core::{EventId, NodeId, NodeKind, Point, SimTime};

use crate::comm::{DropReason, Message};
use crate::sim::RunSummary;

/// Callbacks invoked by the [`Simulator`][crate::Simulator] as the run
/// progresses.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers cannot touch simulator
/// state; anything that should change the run belongs in an event handler
/// or in the simulator's receive, mobility-end, and tick hooks.
///
/// # Example: delivery counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Deliveries(usize);
///
/// impl SimObserver for Deliveries {
///     fn on_delivered(&mut self, _msg: &Message, _now: SimTime) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// A `run*` call is about to start dispatching.
    fn on_run_start(&mut self, _now: SimTime) {}

    /// A `run*` call returned normally.  Not called when a handler fails.
    fn on_run_end(&mut self, _summary: &RunSummary) {}

    fn on_node_added(&mut self, _node: NodeId, _kind: NodeKind, _now: SimTime) {}

    fn on_node_removed(&mut self, _node: NodeId, _now: SimTime) {}

    /// A node's position was sampled: after each mobility update and, when
    /// `mobility_step` is configured, for every node on each tick.
    fn on_node_moved(&mut self, _node: NodeId, _position: Point, _now: SimTime) {}

    /// The node's mobility model finished its trajectory, or was already
    /// finished when it started.
    fn on_mobility_end(&mut self, _node: NodeId, _now: SimTime) {}

    /// Called after all `on_node_moved` calls of one periodic tick.
    fn on_mobility_tick(&mut self, _now: SimTime) {}

    /// A copy reached its receiver.  Called before the receiver's hook.
    fn on_delivered(&mut self, _message: &Message, _now: SimTime) {}

    fn on_dropped(&mut self, _message: &Message, _reason: DropReason, _now: SimTime) {}

    /// An event is about to be dispatched.  `label` names the event kind.
    fn on_event_dispatched(&mut self, _event: EventId, _label: &'static str, _now: SimTime) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
