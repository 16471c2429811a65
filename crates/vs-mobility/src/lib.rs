//! `vs-mobility`: node movement models.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`model`]     | `MobilityModel` trait                                      |
//! | [`leg`]       | `Leg`: one constant-speed straight-line movement           |
//! | [`stationary`]| `Static`: fixed position                                   |
//! | [`path`]      | `FixedPath`: scripted `(speed, waypoint)` sequence         |
//! | [`waypoint`]  | `RandomWaypoint`, `RandomWaypointConfig`, `WaypointState`  |
//! | [`trace`]     | `TraceDriven`, `TraceSample`, CSV loaders                  |
//! | [`error`]     | `MobilityError`, `MobilityResult<T>`                       |
//!
//! # Movement model (continuous legs)
//!
//! Every built-in model describes motion as a sequence of [`Leg`]s.  A leg
//! knows where it started, where it ends, and when, so `position_at(t)` is a
//! pure interpolation and does not depend on how often the simulator asks.
//! The simulator only needs to call `on_update` at the instants the model
//! asks for (leg ends, pause ends, trace samples); those calls are where
//! state transitions and random draws happen.

pub mod error;
pub mod leg;
pub mod model;
pub mod path;
pub mod stationary;
pub mod trace;
pub mod waypoint;


pub use error::{MobilityError, MobilityResult};
pub use leg::{ARRIVAL_EPSILON, Leg};
pub use model::{AsAny, MobilityModel};
pub use path::FixedPath;
pub use stationary::Static;
pub use trace::{
    TraceDriven, TraceSample, load_trace_csv, load_trace_reader, load_traces_csv, load_traces_reader,
};
pub use waypoint::{RandomWaypoint, RandomWaypointConfig, WaypointState};
