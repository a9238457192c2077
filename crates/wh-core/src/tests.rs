//! Unit tests for wh-core primitives.

#[cfg(test)]
mod ids {
    use crate::{BotId, EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = BotId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(BotId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(BotId(0) < BotId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(BotId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(BotId(7).to_string(), "BotId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point2D;

    #[test]
    fn zero_distance() {
        let p = Point2D::new(10.0, 20.0);
        assert!(p.distance(p) < 1e-9);
    }

    #[test]
    fn euclidean_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn manhattan_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.manhattan(b) - 7.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod time {
    use crate::time::Interval;
    use crate::{Tick, TickClock};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn clock_tick_at() {
        let clock = TickClock::new(2.0);
        assert_eq!(clock.tick_at(0.0), Tick(0));
        assert_eq!(clock.tick_at(3.9), Tick(1));
        assert_eq!(clock.seconds_at(Tick(5)), 10.0);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = TickClock::new(1.0);
        assert_eq!(clock.ticks_for_secs(0.1), 1);
        assert_eq!(clock.ticks_for_secs(3.0), 3);
    }

    #[test]
    fn interval_overlap_is_half_open() {
        let a = Interval::new(Tick(0), Tick(5));
        let b = Interval::new(Tick(5), Tick(10));
        assert!(!a.overlaps(&b), "touching endpoints must not count as overlap");

        let c = Interval::new(Tick(4), Tick(8));
        assert!(a.overlaps(&c));
    }
}

#[cfg(test)]
mod rng {
    use crate::Rng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = Rng::new(12345);
        let mut r2 = Rng::new(12345);
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn children_diverge() {
        let mut root = Rng::new(1);
        let mut c0 = root.child(0);
        let mut c1 = root.child(1);
        let a: u64 = c0.random();
        let b: u64 = c1.random();
        assert_ne!(a, b);
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = Rng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f32..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = Rng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn weighted_index_picks_nonzero_weight() {
        let mut rng = Rng::new(7);
        let weights = [0.0, 0.0, 5.0, 0.0];
        for _ in 0..20 {
            assert_eq!(rng.weighted_index(&weights), Some(2));
        }
    }

    #[test]
    fn weighted_index_empty_is_none() {
        let mut rng = Rng::new(0);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
    }
}
