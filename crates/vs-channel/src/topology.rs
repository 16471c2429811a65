//! Explicit link set, independent of position.

use std::collections::BTreeSet;

use vs_core::{NodeId, SimTime};

use crate::{ChannelModel, Endpoint, Symmetry};

/// Connectivity given by a fixed list of links.
///
/// Useful for protocol tests where geometry is irrelevant.  In an
/// undirected topology a link `(a, b)` also connects `b` to `a`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticTopology {
    links:    BTreeSet<(NodeId, NodeId)>,
    symmetry: Symmetry,
}

impl StaticTopology {
    pub fn undirected(links: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        Self { links: links.into_iter().collect(), symmetry: Symmetry::Symmetric }
    }

    pub fn directed(links: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        Self { links: links.into_iter().collect(), symmetry: Symmetry::Directed }
    }

    pub fn add_link(&mut self, from: NodeId, to: NodeId) {
        self.links.insert((from, to));
    }

    /// Remove the link, and its reverse when undirected.  Returns `true` if
    /// anything was removed.
    pub fn remove_link(&mut self, from: NodeId, to: NodeId) -> bool {
        let removed = self.links.remove(&(from, to));
        if self.symmetry == Symmetry::Symmetric {
            self.links.remove(&(to, from)) || removed
        } else {
            removed
        }
    }

    pub fn has_link(&self, from: NodeId, to: NodeId) -> bool {
        self.links.contains(&(from, to))
            || (self.symmetry == Symmetry::Symmetric && self.links.contains(&(to, from)))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl ChannelModel for StaticTopology {
    fn connected(&self, from: &Endpoint, to: &Endpoint, _now: SimTime) -> bool {
        self.has_link(from.id, to.id)
    }

    fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    fn name(&self) -> &'static str {
        "static_topology"
    }
}
