//! Unit tests for vs-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EventId, MessageId, NodeId};

    #[test]
    fn ordering_and_next() {
        assert!(NodeId(1) < NodeId(2));
        assert_eq!(EventId(9).next(), EventId(10));
        assert_eq!(MessageId::from(3).get(), 3);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "node#7");
        assert_eq!(EventId(0).to_string(), "event#0");
    }
}

#[cfg(test)]
mod time {
    use crate::{CoreError, SimConfig, SimTime};

    #[test]
    fn rejects_negative_and_non_finite() {
        assert_eq!(SimTime::new(-1.0), Err(CoreError::InvalidTime(-1.0)));
        assert!(SimTime::new(f64::NAN).is_err());
        assert!(SimTime::new(f64::INFINITY).is_err());
    }

    #[test]
    fn negative_zero_equals_zero() {
        let z = SimTime::new(-0.0).unwrap();
        assert_eq!(z, SimTime::ZERO);
        assert_eq!(z.cmp(&SimTime::ZERO), std::cmp::Ordering::Equal);
    }

    #[test]
    fn after_and_since() {
        let t = SimTime::from(10);
        assert_eq!(t.after(2.5).unwrap(), SimTime::new(12.5).unwrap());
        assert!(t.after(-1.0).is_err());
        assert_eq!(SimTime::from(12).since(t), 2.0);
        assert_eq!(t.since(SimTime::from(12)), 0.0);
    }

    #[test]
    fn total_order() {
        let mut v = vec![SimTime::from(3), SimTime::ZERO, SimTime::new(1.5).unwrap()];
        v.sort();
        assert_eq!(v, vec![SimTime::ZERO, SimTime::new(1.5).unwrap(), SimTime::from(3)]);
    }

    #[test]
    fn config_validation() {
        assert!(SimConfig::default().validate().is_ok());

        let bad_stop = SimConfig { start_time: 10.0, stop_time: Some(5.0), ..Default::default() };
        assert!(bad_stop.validate().is_err());

        let bad_step = SimConfig { mobility_step: Some(0.0), ..Default::default() };
        assert!(bad_step.validate().is_err());

        let bad_start = SimConfig { start_time: -1.0, ..Default::default() };
        assert!(bad_start.validate().is_err());
    }
}

#[cfg(test)]
mod geo {
    use crate::{Area, Heading, Point};

    #[test]
    fn distance_2d_and_3d() {
        assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
        let d = Point::new_3d(0.0, 0.0, 0.0).distance_to(Point::new_3d(1.0, 2.0, 2.0));
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn lerp_clamps() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, -10.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, -5.0));
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
    }

    #[test]
    fn azimuth_compass_convention() {
        let o = Point::ORIGIN;
        assert!((o.azimuth_to(Point::new(0.0, 1.0)).degrees() - 0.0).abs() < 1e-9);
        assert!((o.azimuth_to(Point::new(1.0, 0.0)).degrees() - 90.0).abs() < 1e-9);
        assert!((o.azimuth_to(Point::new(0.0, -1.0)).degrees() - 180.0).abs() < 1e-9);
        assert!((o.azimuth_to(Point::new(-1.0, 0.0)).degrees() - 270.0).abs() < 1e-9);
        assert_eq!(o.azimuth_to(o), Heading::NORTH);
    }

    #[test]
    fn heading_wraps() {
        assert_eq!(Heading::from_degrees(370.0).degrees(), 10.0);
        assert_eq!(Heading::from_degrees(-90.0).degrees(), 270.0);
        let north = Heading::NORTH;
        assert!(north.is_within(Heading::from_degrees(350.0), 15.0));
        assert!(!north.is_within(Heading::from_degrees(200.0), 15.0));
        assert_eq!(north.offset_to(Heading::from_degrees(270.0)), -90.0);
    }

    #[test]
    fn area_validity() {
        assert!(Area::new(0.0, 0.0, 100.0, 50.0).is_valid());
        assert!(!Area::new(0.0, 0.0, 0.0, 50.0).is_valid());
        assert!(Area::new(0.0, 0.0, 10.0, 10.0).contains(Point::new(10.0, 0.0)));
    }
}

#[cfg(test)]
mod rng {
    use crate::{NodeId, NodeRng, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = NodeRng::new(12345, NodeId(0));
        let mut r2 = NodeRng::new(12345, NodeId(0));
        for _ in 0..100 {
            assert_eq!(r1.uniform(0.0, 1.0), r2.uniform(0.0, 1.0));
        }
    }

    #[test]
    fn different_nodes_differ() {
        let mut r0 = NodeRng::new(1, NodeId(0));
        let mut r1 = NodeRng::new(1, NodeId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent nodes should diverge");
    }

    #[test]
    fn uniform_in_bounds_and_degenerate() {
        let mut rng = NodeRng::new(0, NodeId(0));
        for _ in 0..1000 {
            let v = rng.uniform(2.0, 3.0);
            assert!((2.0..=3.0).contains(&v));
        }
        assert_eq!(rng.uniform(4.0, 4.0), 4.0);
    }

    #[test]
    fn child_rngs_are_reproducible() {
        let mut a = SimRng::new(9);
        let mut b = SimRng::new(9);
        let x: u64 = a.child(1).random();
        let y: u64 = b.child(1).random();
        assert_eq!(x, y);
    }
}

#[cfg(test)]
mod kind {
    use crate::NodeKind;

    #[test]
    fn mobility_and_display() {
        assert!(!NodeKind::BaseStation.is_mobile());
        assert!(NodeKind::Vehicle.is_mobile());
        assert_eq!(NodeKind::default(), NodeKind::Vehicle);
        assert_eq!(NodeKind::Drone.to_string(), "drone");
    }
}
