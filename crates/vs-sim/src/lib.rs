//! `vs-sim`: the discrete-event run loop for the vanet-sim engine.
//!
//! # Run loop
//!
//! ```text
//! loop:
//!   ① stop() requested?                 → Stopped
//!   ② stop_condition(now, queue state)? → Condition
//!   ③ queue empty?                      → QueueEmpty
//!   ④ next event time > max_time?       → clock := max_time, MaxTime
//!   ⑤ pop the earliest (time, id) event, clock := its time, dispatch:
//!        User            → registered handler
//!        MobilityUpdate  → model.on_update, queue the next update
//!        MobilityEnd     → on_mobility_end, the node's end hook
//!        Deliver         → on_delivered, receiver hook
//!        RetryBuffered   → resend, expire, or keep outbox copies
//!        MobilityTick    → on_node_moved for every node, the tick hook
//! ```
//!
//! A handler error stops the loop at ⑤ with the clock at the failing
//! event's time.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `run_replicas` runs replicas on Rayon's thread pool.    |
//! | `fx-hash`  | FxHash for the event queue's pending set.               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use vs_channel::{DistanceThreshold, PropagationDelay};
//! use vs_core::{NodeId, Point, SimConfig, SimTime};
//! use vs_sim::{NodeSpec, Recipient, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), DistanceThreshold::new(10.0)?)
//!     .propagation_delay(PropagationDelay::constant(2.0)?)
//!     .node(NodeSpec::fixed(NodeId(1), Point::new(0.0, 0.0))?)
//!     .node(NodeSpec::fixed(NodeId(2), Point::new(5.0, 0.0))?)
//!     .build()?;
//! let hello = sim.register_handler(|sim, payload| {
//!     sim.send(NodeId(1), Recipient::Unicast(NodeId(2)), payload)?;
//!     Ok(())
//! });
//! sim.schedule(SimTime::ZERO, hello, b"hi".to_vec())?;
//! sim.run()?;
//! ```

pub mod builder;
pub mod comm;
pub mod error;
pub mod event;
pub mod node;
pub mod observer;
pub mod replica;
pub mod sim;


pub use builder::SimBuilder;
pub use comm::{DeliveryPolicy, DropReason, Message, Recipient, SendReport, Transceiver};
pub use error::{HandlerError, HandlerResult, SimError, SimResult};
pub use event::EventKind;
pub use node::{Node, NodeSpec};
pub use observer::{NoopObserver, SimObserver};
pub use replica::{replica_seeds, run_replicas};
pub use sim::{Handler, MobilityEndHook, ReceiveHook, RunSummary, Simulator, StopReason, TickHook};
