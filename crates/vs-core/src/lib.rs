//! `vs-core`: foundational types for the `vanet-sim` engine.
//!
//! Every other `vs-*` crate depends on this one.  It has no `vs-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EventId`, `HandlerId`, `MessageId`             |
//! | [`geo`]     | `Point`, `Heading`, `Area`                                |
//! | [`time`]    | `SimTime`, `SimConfig`                                    |
//! | [`rng`]     | `NodeRng` (per-node), `SimRng` (simulation-wide)          |
//! | [`kind`]    | `NodeKind` enum                                           |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to value and config types.  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod kind;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Area, Heading, Point};
pub use ids::{EventId, HandlerId, MessageId, NodeId};
pub use kind::NodeKind;
pub use rng::{NodeRng, SimRng};
pub use time::{SimConfig, SimTime};
