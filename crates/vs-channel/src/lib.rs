//! `vs-channel`: who can hear whom, and how long it takes.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`model`]     | `ChannelModel` trait, `Endpoint`, `Symmetry`             |
//! | [`disc`]      | `DistanceThreshold`: connected within a fixed radius     |
//! | [`path_loss`] | `PathLoss`: log-distance link budget                     |
//! | [`sector`]    | `Sector`: directional antenna beam                       |
//! | [`topology`]  | `StaticTopology`: explicit link set                      |
//! | [`delay`]     | `PropagationDelay`                                       |
//! | [`index`]     | `NeighborIndex`: R-tree range queries over positions     |
//! | [`error`]     | `ChannelError`, `ChannelResult<T>`                       |
//!
//! Channel models are pure: the answer for a pair of endpoints depends only
//! on their positions, headings, and the current time.  Frequency matching
//! and message bookkeeping live in the simulator's communication layer.

pub mod delay;
pub mod disc;
pub mod error;
pub mod index;
pub mod model;
pub mod path_loss;
pub mod sector;
pub mod topology;

#[cfg(test)]
mod tests;

pub use delay::PropagationDelay;
pub use disc::DistanceThreshold;
pub use error::{ChannelError, ChannelResult};
pub use index::NeighborIndex;
pub use model::{ChannelModel, Endpoint, Symmetry};
pub use path_loss::PathLoss;
pub use sector::Sector;
pub use topology::StaticTopology;
