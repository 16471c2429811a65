//! Unit tests for vs-channel.

use vs_core::{Heading, NodeId, Point, SimTime};

use crate::{ChannelModel, Endpoint};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn at(id: u32, x: f64, y: f64) -> Endpoint {
    Endpoint::new(NodeId(id), Point::new(x, y), Heading::NORTH)
}

fn facing(id: u32, x: f64, y: f64, deg: f64) -> Endpoint {
    Endpoint::new(NodeId(id), Point::new(x, y), Heading::from_degrees(deg))
}

const T0: SimTime = SimTime::ZERO;

// ── DistanceThreshold ─────────────────────────────────────────────────────────

#[cfg(test)]
mod disc {
    use super::*;
    use crate::{DistanceThreshold, Symmetry};

    #[test]
    fn connected_within_radius() {
        let ch = DistanceThreshold::new(10.0).unwrap();
        assert!(ch.connected(&at(1, 0.0, 0.0), &at(2, 5.0, 0.0), T0));
        assert!(!ch.connected(&at(1, 0.0, 0.0), &at(2, 20.0, 0.0), T0));
        assert_eq!(ch.symmetry(), Symmetry::Symmetric);
        assert_eq!(ch.max_range(), Some(10.0));
    }

    #[test]
    fn edge_is_connected_with_zero_quality() {
        let ch = DistanceThreshold::new(10.0).unwrap();
        let (a, b) = (at(1, 0.0, 0.0), at(2, 10.0, 0.0));
        assert!(ch.connected(&a, &b, T0));
        assert_eq!(ch.quality(&a, &b, T0), 0.0);
        assert!((ch.quality(&a, &at(3, 5.0, 0.0), T0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn symmetric_for_arbitrary_pairs() {
        let ch = DistanceThreshold::new(25.0).unwrap();
        let pts = [(0.0, 0.0), (10.0, 20.0), (-15.0, 3.0), (24.0, 1.0), (100.0, 100.0)];
        for (i, &(ax, ay)) in pts.iter().enumerate() {
            for &(bx, by) in &pts[i + 1..] {
                let (a, b) = (at(1, ax, ay), at(2, bx, by));
                assert_eq!(ch.connected(&a, &b, T0), ch.connected(&b, &a, T0));
            }
        }
    }

    #[test]
    fn rejects_bad_radius() {
        assert!(DistanceThreshold::new(0.0).is_err());
        assert!(DistanceThreshold::new(-1.0).is_err());
        assert!(DistanceThreshold::new(f64::NAN).is_err());
    }
}

// ── PathLoss ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod path_loss {
    use super::*;
    use crate::PathLoss;

    /// 20 dBm, 40 dB at 1 m, n = 2, -80 dBm sensitivity → 60 dB margin,
    /// range = 10^(60/20) = 1000 m.
    fn budget() -> PathLoss {
        PathLoss::new(20.0, 40.0, 1.0, 2.0, -80.0).unwrap()
    }

    #[test]
    fn range_from_budget() {
        let ch = budget();
        assert!((ch.range() - 1000.0).abs() < 1e-6);
        assert!(ch.connected(&at(1, 0.0, 0.0), &at(2, 999.0, 0.0), T0));
        assert!(!ch.connected(&at(1, 0.0, 0.0), &at(2, 1001.0, 0.0), T0));
    }

    #[test]
    fn quality_decreases_with_distance() {
        let ch = budget();
        let o = at(1, 0.0, 0.0);
        let near = ch.quality(&o, &at(2, 0.5, 0.0), T0);
        let mid = ch.quality(&o, &at(2, 100.0, 0.0), T0);
        let far = ch.quality(&o, &at(2, 2000.0, 0.0), T0);
        assert_eq!(near, 1.0);
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(far, 0.0);
    }

    #[test]
    fn rejects_negative_margin() {
        assert!(PathLoss::new(0.0, 40.0, 1.0, 2.0, -20.0).is_err());
        assert!(PathLoss::new(20.0, 40.0, 1.0, 0.0, -80.0).is_err());
    }
}

// ── Sector ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sector {
    use super::*;
    use crate::{Sector, Symmetry};

    #[test]
    fn beam_restricts_reach() {
        // 90° beam pointing east.
        let ch = Sector::new(100.0, 90.0, 90.0).unwrap();
        let tx = at(1, 0.0, 0.0);
        assert!(ch.connected(&tx, &at(2, 50.0, 0.0), T0));
        assert!(ch.connected(&tx, &at(3, 50.0, 40.0), T0));
        assert!(!ch.connected(&tx, &at(4, 0.0, 50.0), T0));
        assert!(!ch.connected(&tx, &at(5, 150.0, 0.0), T0));
        assert_eq!(ch.symmetry(), Symmetry::Directed);
    }

    #[test]
    fn directed_reach_is_one_way() {
        let ch = Sector::new(100.0, 60.0, 90.0).unwrap();
        let (west, east) = (at(1, 0.0, 0.0), at(2, 50.0, 0.0));
        assert!(ch.connected(&west, &east, T0));
        assert!(!ch.connected(&east, &west, T0));
    }

    #[test]
    fn beam_wraps_through_north() {
        let ch = Sector::new(100.0, 60.0, 350.0).unwrap();
        let tx = at(1, 0.0, 0.0);
        // Bearing ~11° is within 350 ± 30.
        assert!(ch.connected(&tx, &at(2, 10.0, 50.0), T0));
    }

    #[test]
    fn follows_sender_heading() {
        let ch = Sector::new(100.0, 40.0, 0.0).unwrap().following_heading();
        let target = at(2, 0.0, -50.0);
        assert!(!ch.connected(&facing(1, 0.0, 0.0, 0.0), &target, T0));
        assert!(ch.connected(&facing(1, 0.0, 0.0, 180.0), &target, T0));
    }

    #[test]
    fn omni_and_invalid_widths() {
        let omni = Sector::new(10.0, 360.0, 0.0).unwrap();
        assert!(omni.connected(&at(1, 0.0, 0.0), &at(2, 0.0, -5.0), T0));
        assert!(Sector::new(10.0, 0.0, 0.0).is_err());
        assert!(Sector::new(10.0, 400.0, 0.0).is_err());
    }
}

// ── StaticTopology ────────────────────────────────────────────────────────────

#[cfg(test)]
mod topology {
    use super::*;
    use crate::{StaticTopology, Symmetry};

    #[test]
    fn undirected_links_work_both_ways() {
        let ch = StaticTopology::undirected([(NodeId(1), NodeId(2))]);
        // Far apart, but linked.
        assert!(ch.connected(&at(1, 0.0, 0.0), &at(2, 1e6, 0.0), T0));
        assert!(ch.connected(&at(2, 1e6, 0.0), &at(1, 0.0, 0.0), T0));
        assert!(!ch.connected(&at(1, 0.0, 0.0), &at(3, 1.0, 0.0), T0));
    }

    #[test]
    fn directed_links_one_way() {
        let mut ch = StaticTopology::directed([(NodeId(1), NodeId(2))]);
        assert_eq!(ch.symmetry(), Symmetry::Directed);
        assert!(ch.has_link(NodeId(1), NodeId(2)));
        assert!(!ch.has_link(NodeId(2), NodeId(1)));

        ch.add_link(NodeId(2), NodeId(1));
        assert!(ch.has_link(NodeId(2), NodeId(1)));
        assert!(ch.remove_link(NodeId(1), NodeId(2)));
        assert!(!ch.has_link(NodeId(1), NodeId(2)));
        assert_eq!(ch.len(), 1);
    }
}

// ── PropagationDelay ──────────────────────────────────────────────────────────

#[cfg(test)]
mod delay {
    use crate::PropagationDelay;

    #[test]
    fn variants() {
        assert_eq!(PropagationDelay::default().delay_for(100.0), 0.0);
        assert_eq!(PropagationDelay::constant(2.0).unwrap().delay_for(100.0), 2.0);
        let lin = PropagationDelay::linear(0.5, 0.01).unwrap();
        assert!((lin.delay_for(100.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_negative_config() {
        assert!(PropagationDelay::constant(-1.0).is_err());
        assert!(PropagationDelay::linear(0.0, -0.1).is_err());
        assert!(PropagationDelay::Constant(-3.0).validate().is_err());
    }

    #[test]
    fn negative_custom_result_clamps() {
        let d = PropagationDelay::Custom(|dist| 1.0 - dist);
        assert_eq!(d.delay_for(5.0), 0.0);
        assert_eq!(d.delay_for(0.25), 0.75);
    }
}

// ── NeighborIndex ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use super::*;
    use crate::NeighborIndex;

    #[test]
    fn range_query_sorted_and_inclusive() {
        let idx = NeighborIndex::build(
            T0,
            [
                (NodeId(9), Point::new(3.0, 4.0)),
                (NodeId(2), Point::new(1.0, 0.0)),
                (NodeId(5), Point::new(50.0, 0.0)),
                (NodeId(1), Point::ORIGIN),
            ],
        );
        assert_eq!(idx.len(), 4);
        assert_eq!(idx.within(Point::ORIGIN, 5.0), vec![NodeId(1), NodeId(2), NodeId(9)]);
        assert_eq!(idx.within(Point::new(50.0, 0.0), 0.5), vec![NodeId(5)]);
    }

    #[test]
    fn empty_index() {
        let idx = NeighborIndex::build(T0, std::iter::empty());
        assert!(idx.is_empty());
        assert!(idx.within(Point::ORIGIN, 100.0).is_empty());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::{DistanceThreshold, PathLoss, Symmetry};

    /// Decimetre grid over roughly ±3.3 km.
    fn endpoints(a: (i16, i16), b: (i16, i16)) -> (Endpoint, Endpoint) {
        let scale = |v: i16| f64::from(v) / 10.0;
        (at(1, scale(a.0), scale(a.1)), at(2, scale(b.0), scale(b.1)))
    }

    fn holds_both_ways(ch: &impl ChannelModel, a: &Endpoint, b: &Endpoint) -> bool {
        ch.symmetry() == Symmetry::Symmetric
            && ch.connected(a, b, T0) == ch.connected(b, a, T0)
            && ch.quality(a, b, T0) == ch.quality(b, a, T0)
    }

    #[quickcheck]
    fn distance_threshold_is_symmetric(a: (i16, i16), b: (i16, i16)) -> bool {
        let ch = DistanceThreshold::new(250.0).unwrap();
        let (a, b) = endpoints(a, b);
        holds_both_ways(&ch, &a, &b)
    }

    #[quickcheck]
    fn path_loss_is_symmetric(a: (i16, i16), b: (i16, i16)) -> bool {
        let ch = PathLoss::new(20.0, 40.0, 1.0, 2.7, -85.0).unwrap();
        let (a, b) = endpoints(a, b);
        holds_both_ways(&ch, &a, &b)
    }
}
