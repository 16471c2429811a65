//! R-tree over node positions at one instant.
//!
//! Broadcast fan-out and neighbour queries only need to test nodes within
//! the channel's [`max_range`](crate::ChannelModel::max_range).  The index
//! answers that range query in O(log n + k) instead of scanning every node.
//! Positions change continuously, so an index is a snapshot: it records the
//! instant it was built for and the simulator rebuilds it when time moves
//! or the node set changes.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use vs_core::{NodeId, Point, SimTime};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 3],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

#[inline]
fn coords(p: Point) -> [f64; 3] {
    [p.x, p.y, p.z]
}

// ── NeighborIndex ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct NeighborIndex {
    tree:     RTree<NodeEntry>,
    built_at: SimTime,
}

impl NeighborIndex {
    /// Bulk-load a snapshot of `(id, position)` pairs taken at `at`.
    pub fn build(at: SimTime, nodes: impl IntoIterator<Item = (NodeId, Point)>) -> Self {
        let entries: Vec<NodeEntry> = nodes
            .into_iter()
            .map(|(id, p)| NodeEntry { point: coords(p), id })
            .collect();
        Self { tree: RTree::bulk_load(entries), built_at: at }
    }

    #[inline]
    pub fn built_at(&self) -> SimTime {
        self.built_at
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Ids of every node within `radius` of `centre` (inclusive), in
    /// ascending `NodeId` order.
    pub fn within(&self, centre: Point, radius: f64) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .tree
            .locate_within_distance(coords(centre), radius * radius)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
