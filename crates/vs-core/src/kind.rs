//! Node category labels.
//!
//! The engine treats every kind identically.  Kinds exist so observers
//! (visualisers, statistics collectors) can tell infrastructure from
//! vehicles without keeping a side table.

/// What sort of entity a node represents.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NodeKind {
    /// Fixed roadside infrastructure.
    BaseStation,
    /// Road vehicle (default).
    #[default]
    Vehicle,
    /// Aerial node.
    Drone,
}

impl NodeKind {
    /// `true` for kinds that normally move.
    #[inline]
    pub fn is_mobile(self) -> bool {
        !matches!(self, NodeKind::BaseStation)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::BaseStation => "base_station",
            NodeKind::Vehicle     => "vehicle",
            NodeKind::Drone       => "drone",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
