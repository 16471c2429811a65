//! The `Simulator` struct and its run loop.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use log::{debug, info, warn};

use vs_channel::{ChannelModel, NeighborIndex, PropagationDelay};
use vs_core::{EventId, HandlerId, MessageId, NodeId, Point, SimConfig, SimTime};
use vs_mobility::{AsAny, MobilityModel};
use vs_schedule::{Event, EventQueue, QueueState};

use crate::comm::{DeliveryPolicy, DropReason, Message, Recipient, SendReport};
use crate::event::EventKind;
use crate::node::{Node, NodeSpec};
use crate::{HandlerResult, SimError, SimObserver, SimResult};

/// A registered user event handler.
pub type Handler<C> = Box<dyn FnMut(&mut Simulator<C>, &[u8]) -> HandlerResult>;

/// A node's hook for delivered messages.
pub type ReceiveHook<C> = Box<dyn FnMut(&mut Simulator<C>, &Message) -> HandlerResult>;

/// A node's hook for the end of its trajectory.
pub type MobilityEndHook<C> = Box<dyn FnMut(&mut Simulator<C>, NodeId) -> HandlerResult>;

/// Called once per periodic mobility tick, after the observers.
pub type TickHook<C> = Box<dyn FnMut(&mut Simulator<C>) -> HandlerResult>;

/// Relative slack on range queries so R-tree rounding never prunes a node
/// the channel itself would connect.
const RANGE_SLACK: f64 = 1e-9;

// ── Run outcome ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No live events remain.
    QueueEmpty,
    /// The next event lies beyond `max_time`; the clock was moved to
    /// `max_time` and the event left queued.
    MaxTime,
    /// The stop condition returned `true`.
    Condition,
    /// [`Simulator::stop`] was called.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub reason:     StopReason,
    /// Events dispatched by this call.
    pub dispatched: u64,
    pub final_time: SimTime,
}

/// Outcome of a successful channel check.
#[derive(Debug, Clone, Copy)]
struct Link {
    distance: f64,
    quality:  f64,
}

// ── Simulator ─────────────────────────────────────────────────────────────────

/// The discrete-event engine.
///
/// `Simulator<C>` owns the event queue (and with it the clock), every node,
/// the channel model, the handler registry, and the observers.  The run
/// loop pops one event at a time in `(time, id)` order and dispatches it to
/// completion before looking at the next:
///
/// | Event              | Effect                                                    |
/// |--------------------|-----------------------------------------------------------|
/// | `User`             | call the registered handler with its payload              |
/// | `MobilityUpdate`   | `on_update` the node's model, queue its next update       |
/// | `MobilityEnd`      | report a model that started out finished                  |
/// | `Deliver`          | `on_delivered`, then the receiver's hook                  |
/// | `RetryBuffered`    | re-check the node's outbox: send, expire, or keep waiting |
/// | `MobilityTick`     | report every node's position                              |
///
/// Create via [`SimBuilder`][crate::SimBuilder] or [`Simulator::new`].
pub struct Simulator<C: ChannelModel> {
    config:         SimConfig,
    stop_time:      Option<SimTime>,
    queue:          EventQueue<EventKind>,
    /// Keyed by id so fan-out and ticks visit nodes in ascending order.
    nodes:          BTreeMap<NodeId, Node>,
    channel:        C,
    delay:          PropagationDelay,
    /// Indexed by `HandlerId`.  A slot is `None` while its handler runs.
    handlers:       Vec<Option<Handler<C>>>,
    receivers:      BTreeMap<NodeId, ReceiveHook<C>>,
    end_hooks:      BTreeMap<NodeId, MobilityEndHook<C>>,
    tick_hook:      Option<TickHook<C>>,
    observers:      Vec<Box<dyn SimObserver>>,
    /// Position snapshot for range queries; rebuilt when stale.
    index:          RefCell<Option<NeighborIndex>>,
    next_message:   MessageId,
    stop_requested: bool,
    tick_pending:   Option<EventId>,
    last_tick:      Option<SimTime>,
    incarnations:   u64,
}

impl<C: ChannelModel> Simulator<C> {
    /// A simulator with no nodes, zero propagation delay, and no observers.
    pub fn new(config: SimConfig, channel: C) -> SimResult<Self> {
        crate::SimBuilder::new(config, channel).build()
    }

    pub(crate) fn from_parts(
        config:    SimConfig,
        channel:   C,
        delay:     PropagationDelay,
        observers: Vec<Box<dyn SimObserver>>,
    ) -> SimResult<Self> {
        config.validate()?;
        delay.validate()?;
        let start = config.start()?;
        let stop_time = config.stop()?;
        Ok(Self {
            config,
            stop_time,
            queue:          EventQueue::starting_at(start),
            nodes:          BTreeMap::new(),
            channel,
            delay,
            handlers:       Vec::new(),
            receivers:      BTreeMap::new(),
            end_hooks:      BTreeMap::new(),
            tick_hook:      None,
            observers,
            index:          RefCell::new(None),
            next_message:   MessageId(0),
            stop_requested: false,
            tick_pending:   None,
            last_tick:      None,
            incarnations:   0,
        })
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.queue.now()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn propagation_delay(&self) -> PropagationDelay {
        self.delay
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Ids of every node, ascending.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn position_of(&self, id: NodeId) -> SimResult<Point> {
        self.nodes
            .get(&id)
            .map(|n| n.position_at(self.now()))
            .ok_or(SimError::NodeNotFound(id))
    }

    /// Number of live queued events, engine events included.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, event: EventId) -> bool {
        self.queue.is_pending(event)
    }

    /// Nodes that a transmission from `id` would reach right now, ascending.
    pub fn neighbors(&self, id: NodeId) -> SimResult<Vec<NodeId>> {
        let now = self.now();
        let origin = self.position_of(id)?;
        let candidates: Vec<NodeId> = match self.channel.max_range() {
            Some(range) => self.with_index(now, |idx| {
                idx.within(origin, range + RANGE_SLACK * range.max(1.0))
            }),
            None => self.nodes.keys().copied().collect(),
        };
        Ok(candidates
            .into_iter()
            .filter(|&other| other != id && self.link(id, other, now).is_some())
            .collect())
    }

    // ── Observers ─────────────────────────────────────────────────────────

    pub fn add_observer(&mut self, observer: impl SimObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    /// Add a node and queue its model's first update.
    ///
    /// Works before or during a run; the model starts at the current time.
    pub fn add_node(&mut self, spec: NodeSpec) -> SimResult<NodeId> {
        let id = spec.id;
        if self.nodes.contains_key(&id) {
            return Err(SimError::DuplicateNode(id));
        }
        spec.policy.validate()?;
        if !spec.frequency.is_finite() {
            return Err(SimError::Config(format!("{id} has non-finite frequency {}", spec.frequency)));
        }

        let now = self.now();
        let mut node = Node::from_spec(spec, self.config.seed, self.incarnations);
        self.incarnations += 1;
        let first = node.mobility.initial_schedule(now);
        let finished = first.is_none() && node.mobility.is_finished();
        let kind = node.kind();
        let model = node.mobility.name();
        self.nodes.insert(id, node);
        self.queue_first_update(id, first, finished)?;
        self.invalidate_index();

        debug!("{now} added {id} ({kind}, {model})");
        self.notify(|o| o.on_node_added(id, kind, now));
        Ok(id)
    }

    /// Remove a node mid-run.
    ///
    /// Its hooks are discarded, its queued mobility update and outbox retry
    /// are cancelled, and its outbox is dropped with
    /// [`DropReason::SenderRemoved`].  Copies still in flight to it are
    /// dropped on arrival.
    pub fn remove_node(&mut self, id: NodeId) -> SimResult<()> {
        let mut node = self.nodes.remove(&id).ok_or(SimError::NodeNotFound(id))?;
        let now = self.now();
        for event in [node.pending_update.take(), node.pending_retry.take()].into_iter().flatten() {
            self.queue.cancel(event);
        }
        self.receivers.remove(&id);
        self.end_hooks.remove(&id);
        self.invalidate_index();

        let orphaned: Vec<Message> = node.transceiver.outbox.drain(..).collect();
        for msg in &orphaned {
            self.report_drop(msg, DropReason::SenderRemoved, now);
        }
        debug!("{now} removed {id}");
        self.notify(|o| o.on_node_removed(id, now));
        Ok(())
    }

    /// Swap a node's mobility model.
    ///
    /// The pending update of the old model is cancelled and the new model
    /// starts from the current time.
    pub fn set_mobility(&mut self, id: NodeId, model: impl MobilityModel + 'static) -> SimResult<()> {
        self.set_mobility_boxed(id, Box::new(model))
    }

    pub fn set_mobility_boxed(&mut self, id: NodeId, model: Box<dyn MobilityModel>) -> SimResult<()> {
        let node = self.nodes.get_mut(&id).ok_or(SimError::NodeNotFound(id))?;
        node.mobility = model;
        self.restart_mobility(id)
    }

    /// Borrow a node's model as its concrete type.
    pub fn mobility_as<M: MobilityModel + 'static>(&self, id: NodeId) -> SimResult<&M> {
        let node = self.nodes.get(&id).ok_or(SimError::NodeNotFound(id))?;
        AsAny::as_any(&*node.mobility)
            .downcast_ref::<M>()
            .ok_or(SimError::ModelMismatch { node: id, expected: std::any::type_name::<M>() })
    }

    /// Edit a node's model in place, then restart it from the current time
    /// as [`set_mobility`](Self::set_mobility) would.
    ///
    /// ```rust,ignore
    /// sim.reconfigure_mobility(id, |path: &mut FixedPath, now| path.reset_path(now, 30.0, exit))??;
    /// ```
    pub fn reconfigure_mobility<M, R>(&mut self, id: NodeId, edit: impl FnOnce(&mut M, SimTime) -> R) -> SimResult<R>
    where
        M: MobilityModel + 'static,
    {
        let now = self.now();
        let node = self.nodes.get_mut(&id).ok_or(SimError::NodeNotFound(id))?;
        let model = AsAny::as_any_mut(&mut *node.mobility)
            .downcast_mut::<M>()
            .ok_or(SimError::ModelMismatch { node: id, expected: std::any::type_name::<M>() })?;
        let out = edit(model, now);
        self.restart_mobility(id)?;
        Ok(out)
    }

    /// Cancel the node's queued update and start its model afresh at now.
    fn restart_mobility(&mut self, id: NodeId) -> SimResult<()> {
        let now = self.now();
        let node = self.nodes.get_mut(&id).ok_or(SimError::NodeNotFound(id))?;
        if let Some(stale) = node.pending_update.take() {
            self.queue.cancel(stale);
        }
        let first = node.mobility.initial_schedule(now);
        let finished = first.is_none() && node.mobility.is_finished();
        let position = node.position_at(now);

        self.invalidate_index();
        self.queue_first_update(id, first, finished)?;
        self.notify(|o| o.on_node_moved(id, position, now));
        Ok(())
    }

    // ── Handlers and user events ──────────────────────────────────────────

    pub fn register_handler<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(&mut Simulator<C>, &[u8]) -> HandlerResult + 'static,
    {
        let id = HandlerId(self.handlers.len() as u32);
        self.handlers.push(Some(Box::new(handler)));
        id
    }

    /// Install the hook called with every message delivered to `node`.
    /// Replaces any previous hook.
    pub fn set_receive_handler<F>(&mut self, node: NodeId, hook: F) -> SimResult<()>
    where
        F: FnMut(&mut Simulator<C>, &Message) -> HandlerResult + 'static,
    {
        if !self.nodes.contains_key(&node) {
            return Err(SimError::NodeNotFound(node));
        }
        self.receivers.insert(node, Box::new(hook));
        Ok(())
    }

    /// Install the hook called when `node`'s model finishes its trajectory,
    /// after the observers' `on_mobility_end`.  Replaces any previous hook.
    ///
    /// The hook may change the world: give the node a new path, remove it,
    /// or add a replacement.
    pub fn set_mobility_end_handler<F>(&mut self, node: NodeId, hook: F) -> SimResult<()>
    where
        F: FnMut(&mut Simulator<C>, NodeId) -> HandlerResult + 'static,
    {
        if !self.nodes.contains_key(&node) {
            return Err(SimError::NodeNotFound(node));
        }
        self.end_hooks.insert(node, Box::new(hook));
        Ok(())
    }

    /// Install the hook called on every periodic mobility tick.  Has no
    /// effect unless `mobility_step` is configured.
    pub fn set_mobility_tick_handler<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Simulator<C>) -> HandlerResult + 'static,
    {
        self.tick_hook = Some(Box::new(hook));
    }

    /// Queue `handler` to run at `time` with `payload`.
    ///
    /// Fails with [`SimError::InvalidTime`] if `time` is before now.
    pub fn schedule(
        &mut self,
        time:    SimTime,
        handler: HandlerId,
        payload: impl Into<Vec<u8>>,
    ) -> SimResult<EventId> {
        self.check_handler(handler)?;
        let kind = EventKind::User { handler, payload: payload.into() };
        Ok(self.queue.schedule(time, kind)?)
    }

    /// Queue `handler` to run `delay` seconds from now.
    pub fn schedule_in(
        &mut self,
        delay:   f64,
        handler: HandlerId,
        payload: impl Into<Vec<u8>>,
    ) -> SimResult<EventId> {
        self.check_handler(handler)?;
        let kind = EventKind::User { handler, payload: payload.into() };
        Ok(self.queue.schedule_in(delay, kind)?)
    }

    /// Cancel a queued event.  Returns `true` if it was still pending; a
    /// cancelled event is never dispatched.
    pub fn cancel(&mut self, event: EventId) -> bool {
        self.queue.cancel(event)
    }

    /// Ask the run loop to return before the next dispatch.
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run until the queue drains, `stop()` is called, or the configured
    /// `stop_time` is reached.
    pub fn run(&mut self) -> SimResult<RunSummary> {
        let limit = self.stop_time;
        self.run_with(limit, |_, _| false)
    }

    /// Run, dispatching only events at or before `max_time`.
    pub fn run_until(&mut self, max_time: SimTime) -> SimResult<RunSummary> {
        self.run_with(Some(max_time), |_, _| false)
    }

    /// The general run loop.
    ///
    /// Before each pop, in order: a pending `stop()` ends the run; then
    /// `stop_condition(now, state)`; then an empty queue; then an event
    /// beyond `max_time`, which moves the clock to `max_time` and stays
    /// queued.  A handler error ends the run with the clock at the failing
    /// event's time.
    pub fn run_with<F>(&mut self, max_time: Option<SimTime>, mut stop_condition: F) -> SimResult<RunSummary>
    where
        F: FnMut(SimTime, &QueueState) -> bool,
    {
        self.arm_tick_if_idle()?;
        let start = self.now();
        info!(
            "run started at {start}: {} nodes, {} pending events, limit {}",
            self.nodes.len(),
            self.queue.len(),
            max_time.map_or_else(|| "none".to_string(), |t| t.to_string()),
        );
        self.notify(|o| o.on_run_start(start));

        let mut dispatched = 0u64;
        let outcome = loop {
            if self.stop_requested {
                break Ok(StopReason::Stopped);
            }
            let state = self.queue.state();
            if stop_condition(state.now, &state) {
                break Ok(StopReason::Condition);
            }
            let Some(next) = state.next_time else {
                break Ok(StopReason::QueueEmpty);
            };
            if let Some(limit) = max_time {
                if next > limit {
                    if limit > self.now() {
                        if let Err(e) = self.queue.advance_to(limit) {
                            break Err(e.into());
                        }
                    }
                    break Ok(StopReason::MaxTime);
                }
            }
            let Some(event) = self.queue.pop_next() else {
                break Ok(StopReason::QueueEmpty);
            };
            if let Err(e) = self.dispatch(event) {
                break Err(e);
            }
            dispatched += 1;
        };
        self.stop_requested = false;

        match outcome {
            Ok(reason) => {
                let summary = RunSummary { reason, dispatched, final_time: self.now() };
                info!("run ended at {} ({reason:?}) after {dispatched} events", summary.final_time);
                self.notify(|o| o.on_run_end(&summary));
                Ok(summary)
            }
            Err(e) => {
                warn!("run halted at {} after {dispatched} events: {e}", self.now());
                Err(e)
            }
        }
    }

    // ── Communication ─────────────────────────────────────────────────────

    /// Send `payload` from `from` at the current time.
    ///
    /// Each intended receiver gets its own copy: reachable receivers get a
    /// delivery event after the propagation delay; unreachable ones are
    /// dropped, or buffered when the sender's policy says so.  Broadcast
    /// only addresses currently reachable nodes and never buffers.
    pub fn send(
        &mut self,
        from:    NodeId,
        to:      Recipient,
        payload: impl Into<Vec<u8>>,
    ) -> SimResult<SendReport> {
        let now = self.now();
        let policy = self
            .nodes
            .get(&from)
            .ok_or(SimError::NodeNotFound(from))?
            .transceiver
            .policy();
        let payload = payload.into();
        let id = self.next_message;
        self.next_message = id.next();

        let targets = match to {
            Recipient::Unicast(r) => vec![r],
            Recipient::Multicast(rs) => rs,
            Recipient::Broadcast => self.neighbors(from)?,
        };

        let mut report = SendReport::new(id);
        for receiver in targets {
            let msg = Message {
                id,
                sender: from,
                receiver,
                payload: payload.clone(),
                send_time: now,
                quality: 0.0,
            };
            if !self.nodes.contains_key(&receiver) {
                self.report_drop(&msg, DropReason::ReceiverRemoved, now);
                report.dropped.push(receiver);
                continue;
            }
            match (self.link(from, receiver, now), policy) {
                (Some(link), _) => {
                    self.transmit(msg, link, now)?;
                    report.scheduled.push(receiver);
                }
                (None, DeliveryPolicy::BufferUntilReachable { retry_interval, .. }) => {
                    self.buffer(from, msg, retry_interval, now)?;
                    report.buffered.push(receiver);
                }
                (None, DeliveryPolicy::DropIfUnreachable) => {
                    self.report_drop(&msg, DropReason::Unreachable, now);
                    report.dropped.push(receiver);
                }
            }
        }
        debug!(
            "{now} {from} sent {id}: {} scheduled, {} buffered, {} dropped",
            report.scheduled.len(),
            report.buffered.len(),
            report.dropped.len()
        );
        Ok(report)
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    fn dispatch(&mut self, event: Event<EventKind>) -> SimResult<()> {
        let Event { id, time, payload } = event;
        let label = payload.label();
        debug!("{time} dispatch {id} ({label})");
        self.notify(|o| o.on_event_dispatched(id, label, time));

        match payload {
            EventKind::User { handler, payload } => self.call_handler(id, time, handler, &payload),
            EventKind::MobilityUpdate(node) => self.update_mobility(id, node, time),
            EventKind::MobilityEnd(node) => self.end_mobility(id, node, time),
            EventKind::Deliver(msg) => self.deliver(id, time, msg),
            EventKind::RetryBuffered(node) => self.retry_outbox(node, time),
            EventKind::MobilityTick => self.mobility_tick(id, time),
        }
    }

    fn call_handler(&mut self, event: EventId, time: SimTime, handler: HandlerId, payload: &[u8]) -> SimResult<()> {
        let slot = handler.get() as usize;
        let mut f = self
            .handlers
            .get_mut(slot)
            .and_then(Option::take)
            .ok_or(SimError::UnknownHandler(handler))?;
        let result = f(self, payload);
        if let Some(s) = self.handlers.get_mut(slot) {
            *s = Some(f);
        }
        result.map_err(|source| SimError::Handler { event, time, source })
    }

    fn update_mobility(&mut self, event: EventId, id: NodeId, now: SimTime) -> SimResult<()> {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Ok(());
        };
        node.pending_update = None;
        let next = node.mobility.on_update(now, &mut node.rng);
        let finished = next.is_none() && node.mobility.is_finished();
        let position = node.position_at(now);

        if let Some(at) = next {
            self.schedule_update(id, at)?;
        }
        self.notify(|o| o.on_node_moved(id, position, now));
        if finished {
            self.report_mobility_end(event, id, now)?;
        }
        Ok(())
    }

    fn end_mobility(&mut self, event: EventId, id: NodeId, now: SimTime) -> SimResult<()> {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Ok(());
        };
        node.pending_update = None;
        self.report_mobility_end(event, id, now)
    }

    fn report_mobility_end(&mut self, event: EventId, id: NodeId, now: SimTime) -> SimResult<()> {
        debug!("{now} {id} reached the end of its trajectory");
        self.notify(|o| o.on_mobility_end(id, now));

        let Some(mut hook) = self.end_hooks.remove(&id) else {
            return Ok(());
        };
        let owner = self.incarnation_of(id);
        let result = hook(self, id);
        if self.incarnation_of(id) == owner && !self.end_hooks.contains_key(&id) {
            self.end_hooks.insert(id, hook);
        }
        result.map_err(|source| SimError::Handler { event, time: now, source })
    }

    fn deliver(&mut self, event: EventId, now: SimTime, msg: Message) -> SimResult<()> {
        let receiver = msg.receiver;
        if !self.nodes.contains_key(&receiver) {
            self.report_drop(&msg, DropReason::ReceiverRemoved, now);
            return Ok(());
        }
        self.notify(|o| o.on_delivered(&msg, now));

        let Some(mut hook) = self.receivers.remove(&receiver) else {
            return Ok(());
        };
        let owner = self.incarnation_of(receiver);
        let result = hook(self, &msg);
        // The hook may have removed its node, re-added the id, or installed
        // a replacement.
        if self.incarnation_of(receiver) == owner && !self.receivers.contains_key(&receiver) {
            self.receivers.insert(receiver, hook);
        }
        result.map_err(|source| SimError::Handler { event, time: now, source })
    }

    fn retry_outbox(&mut self, id: NodeId, now: SimTime) -> SimResult<()> {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Ok(());
        };
        node.pending_retry = None;
        let DeliveryPolicy::BufferUntilReachable { ttl, retry_interval } = node.transceiver.policy() else {
            return Ok(());
        };
        let waiting: Vec<Message> = node.transceiver.outbox.drain(..).collect();

        let mut still_waiting = VecDeque::new();
        for msg in waiting {
            if now.since(msg.send_time) > ttl {
                self.report_drop(&msg, DropReason::Expired, now);
            } else if !self.nodes.contains_key(&msg.receiver) {
                self.report_drop(&msg, DropReason::ReceiverRemoved, now);
            } else if let Some(link) = self.link(id, msg.receiver, now) {
                self.transmit(msg, link, now)?;
            } else {
                still_waiting.push_back(msg);
            }
        }

        if !still_waiting.is_empty() {
            let retry = self.queue.schedule(now.after(retry_interval)?, EventKind::RetryBuffered(id))?;
            if let Some(node) = self.nodes.get_mut(&id) {
                node.transceiver.outbox = still_waiting;
                node.pending_retry = Some(retry);
            }
        }
        Ok(())
    }

    fn mobility_tick(&mut self, event: EventId, now: SimTime) -> SimResult<()> {
        self.tick_pending = None;
        self.last_tick = Some(now);
        let positions: Vec<(NodeId, Point)> =
            self.nodes.values().map(|n| (n.id(), n.position_at(now))).collect();
        for (id, position) in positions {
            self.notify(|o| o.on_node_moved(id, position, now));
        }
        self.notify(|o| o.on_mobility_tick(now));

        if let Some(mut hook) = self.tick_hook.take() {
            let result = hook(self);
            if self.tick_hook.is_none() {
                self.tick_hook = Some(hook);
            }
            result.map_err(|source| SimError::Handler { event, time: now, source })?;
        }

        // A lone tick would keep a finished run alive forever.
        if let Some(step) = self.config.mobility_step {
            if !self.queue.is_empty() {
                self.tick_pending = Some(self.queue.schedule(now.after(step)?, EventKind::MobilityTick)?);
            }
        }
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn notify(&mut self, mut f: impl FnMut(&mut dyn SimObserver)) {
        for observer in &mut self.observers {
            f(observer.as_mut());
        }
    }

    fn report_drop(&mut self, msg: &Message, reason: DropReason, now: SimTime) {
        debug!("{now} dropped {} {} -> {}: {reason}", msg.id, msg.sender, msg.receiver);
        self.notify(|o| o.on_dropped(msg, reason, now));
    }

    fn check_handler(&self, handler: HandlerId) -> SimResult<()> {
        if (handler.get() as usize) < self.handlers.len() {
            Ok(())
        } else {
            Err(SimError::UnknownHandler(handler))
        }
    }

    /// Queue a mobility update for `id`.  Models asking for a time in the
    /// past are clamped to now.
    fn schedule_update(&mut self, id: NodeId, at: SimTime) -> SimResult<()> {
        let now = self.now();
        let at = if at < now {
            warn!("{id} asked for a mobility update at {at}, before {now}; clamping");
            now
        } else {
            at
        };
        let event = self.queue.schedule(at, EventKind::MobilityUpdate(id))?;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.pending_update = Some(event);
        }
        Ok(())
    }

    fn arm_tick_if_idle(&mut self) -> SimResult<()> {
        let Some(step) = self.config.mobility_step else {
            return Ok(());
        };
        if self.tick_pending.is_some() {
            return Ok(());
        }
        let now = self.now();
        // Never tick twice at one instant.
        let at = if self.last_tick == Some(now) {
            if self.queue.is_empty() {
                return Ok(());
            }
            now.after(step)?
        } else {
            now
        };
        self.tick_pending = Some(self.queue.schedule(at, EventKind::MobilityTick)?);
        Ok(())
    }

    fn incarnation_of(&self, id: NodeId) -> Option<u64> {
        self.nodes.get(&id).map(|n| n.incarnation)
    }

    /// Queue what a freshly started model needs: its first update, or an
    /// end report when it is already finished.
    fn queue_first_update(&mut self, id: NodeId, first: Option<SimTime>, finished: bool) -> SimResult<()> {
        match first {
            Some(at) => self.schedule_update(id, at),
            None if finished => {
                let now = self.now();
                let event = self.queue.schedule(now, EventKind::MobilityEnd(id))?;
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.pending_update = Some(event);
                }
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Frequency match plus the channel's verdict, with the figures the
    /// send path needs.
    fn link(&self, from: NodeId, to: NodeId, now: SimTime) -> Option<Link> {
        let a = self.nodes.get(&from)?;
        let b = self.nodes.get(&to)?;
        if !a.transceiver.same_band(&b.transceiver) {
            return None;
        }
        let (ea, eb) = (a.endpoint(now), b.endpoint(now));
        if !self.channel.connected(&ea, &eb, now) {
            return None;
        }
        Some(Link {
            distance: ea.distance_to(&eb),
            quality:  self.channel.quality(&ea, &eb, now),
        })
    }

    fn transmit(&mut self, mut msg: Message, link: Link, now: SimTime) -> SimResult<()> {
        msg.quality = link.quality;
        let at = now.after(self.delay.delay_for(link.distance))?;
        self.queue.schedule(at, EventKind::Deliver(msg))?;
        Ok(())
    }

    fn buffer(&mut self, from: NodeId, msg: Message, retry_interval: f64, now: SimTime) -> SimResult<()> {
        let needs_retry = match self.nodes.get_mut(&from) {
            Some(node) => {
                node.transceiver.outbox.push_back(msg);
                node.pending_retry.is_none()
            }
            None => return Err(SimError::NodeNotFound(from)),
        };
        if needs_retry {
            let retry = self.queue.schedule(now.after(retry_interval)?, EventKind::RetryBuffered(from))?;
            if let Some(node) = self.nodes.get_mut(&from) {
                node.pending_retry = Some(retry);
            }
        }
        Ok(())
    }

    fn invalidate_index(&self) {
        self.index.borrow_mut().take();
    }

    fn with_index<R>(&self, now: SimTime, f: impl FnOnce(&NeighborIndex) -> R) -> R {
        let mut cache = self.index.borrow_mut();
        if cache.as_ref().is_some_and(|idx| idx.built_at() != now) {
            *cache = None;
        }
        let idx = cache.get_or_insert_with(|| {
            NeighborIndex::build(now, self.nodes.values().map(|n| (n.id(), n.position_at(now))))
        });
        f(idx)
    }
}
