//! Unit tests for drc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{JobId, SkillId, StationId, WorkerId};

    #[test]
    fn index_roundtrip() {
        let w = WorkerId::new(42);
        assert_eq!(w.index(), 42);
        assert_eq!(w, WorkerId(42));
    }

    #[test]
    fn ordering() {
        assert!(WorkerId(0) < WorkerId(1));
        assert!(JobId(100) > JobId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(WorkerId::INVALID.0, u32::MAX);
        assert_eq!(StationId::INVALID.0, u16::MAX);
        assert_eq!(WorkerId::default(), WorkerId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(WorkerId(7).to_string(), "Worker7");
        assert_eq!(SkillId(3).to_string(), "Skill3");
    }
}

#[cfg(test)]
mod time {
    use crate::SimTime;

    #[test]
    fn arithmetic() {
        let t = SimTime(10.0);
        assert_eq!(t + 5.0, SimTime(15.0));
        assert_eq!(SimTime(15.0) - SimTime(10.0), 5.0);
        assert_eq!(SimTime(15.0).since(SimTime(10.0)), 5.0);
    }

    #[test]
    fn since_clamps_at_zero() {
        assert_eq!(SimTime(1.0).since(SimTime(2.0)), 0.0);
    }

    #[test]
    fn total_order() {
        let mut v = vec![SimTime(3.0), SimTime(1.0), SimTime(2.0)];
        v.sort();
        assert_eq!(v, vec![SimTime(1.0), SimTime(2.0), SimTime(3.0)]);
        assert_eq!(SimTime(1.0).max(SimTime(2.0)), SimTime(2.0));
    }
}

#[cfg(test)]
mod rng {
    use crate::{StreamKind, VariateStream};

    #[test]
    fn deterministic_same_seed() {
        let mut a = VariateStream::new(12345, StreamKind::Processing);
        let mut b = VariateStream::new(12345, StreamKind::Processing);
        for _ in 0..100 {
            assert_eq!(a.normal(5.0, 2.0), b.normal(5.0, 2.0));
        }
    }

    #[test]
    fn streams_are_independent() {
        // Consuming the arrival stream must not disturb the processing
        // stream's sequence.
        let mut reference = VariateStream::new(7, StreamKind::Processing);
        let expected: Vec<f64> = (0..50).map(|_| reference.uniform()).collect();

        let mut arrivals = VariateStream::new(7, StreamKind::Arrival);
        let mut processing = VariateStream::new(7, StreamKind::Processing);
        for _ in 0..1000 {
            arrivals.uniform();
        }
        let got: Vec<f64> = (0..50).map(|_| processing.uniform()).collect();
        assert_eq!(expected, got);
    }

    #[test]
    fn stream_kinds_have_distinct_offsets() {
        let kinds = [
            StreamKind::Arrival,
            StreamKind::DueDate,
            StreamKind::Processing,
            StreamKind::Dispatch,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.offset(), b.offset());
            }
        }
    }

    #[test]
    fn normal_moments_roughly_standard() {
        let mut s = VariateStream::new(42, StreamKind::Processing);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| s.normal(0.0, 1.0)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.1, "variance {var}");
    }

    #[test]
    fn lognormal_zero_sigma_is_exact() {
        let mut s = VariateStream::new(9, StreamKind::DueDate);
        for mu in [0.1, 1.0, 42.0, 1e6] {
            assert_eq!(s.lognormal(mu, 0.0), mu);
        }
        // And it must not consume the stream.
        let mut a = VariateStream::new(9, StreamKind::DueDate);
        let mut b = VariateStream::new(9, StreamKind::DueDate);
        a.lognormal(10.0, 0.0);
        assert_eq!(a.uniform(), b.uniform());
    }

    #[test]
    fn lognormal_preserves_target_mean() {
        // The parameterization sets mu_ln = ln(mu) − sigma_ln²/2, so the
        // distribution mean is exactly mu for any dispersion input.
        let mut s = VariateStream::new(1, StreamKind::Processing);
        let n = 20_000;
        let mean = (0..n).map(|_| s.lognormal(10.0, 1.0)).sum::<f64>() / n as f64;
        assert!((mean - 10.0).abs() < 0.15, "mean {mean}");
    }
}

#[cfg(test)]
mod sample_stats {
    use crate::SampleStats;

    #[test]
    fn known_sequence() {
        let mut s = SampleStats::new();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            s.add(v);
        }
        assert_eq!(s.count(), 5);
        assert_eq!(s.min(), Some(1.0));
        assert_eq!(s.max(), Some(5.0));
        assert_eq!(s.total(), 15.0);
        assert!((s.mean() - 3.0).abs() < 1e-12);
        assert!((s.variance() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_reports_zero() {
        let s = SampleStats::new();
        assert_eq!(s.count(), 0);
        assert_eq!(s.min(), None);
        assert_eq!(s.max(), None);
        assert_eq!(s.mean(), 0.0);
        assert_eq!(s.variance(), 0.0);
    }

    #[test]
    fn reset_discards_everything() {
        let mut s = SampleStats::new();
        s.add(7.0);
        s.add(9.0);
        s.reset();
        assert_eq!(s.count(), 0);
        assert_eq!(s.total(), 0.0);
        s.add(1.0);
        assert_eq!(s.mean(), 1.0);
    }

    #[test]
    fn single_observation_has_zero_variance() {
        let mut s = SampleStats::new();
        s.add(3.5);
        assert_eq!(s.variance(), 0.0);
        assert_eq!(s.mean(), 3.5);
    }
}

#[cfg(test)]
mod time_weighted {
    use crate::{SimTime, TimeWeighted};

    #[test]
    fn step_function_area_and_mean() {
        // Level 2 for 3 time units, then level 5 for 1 unit.
        let mut g = TimeWeighted::new();
        g.update_to(SimTime(0.0), 2.0);
        g.update_to(SimTime(3.0), 5.0);
        g.flush(SimTime(4.0));
        assert!((g.area() - 11.0).abs() < 1e-12);
        assert!((g.mean() - 2.75).abs() < 1e-12);
        // E[x²] − mean² = 37/4 − 2.75² = 1.6875
        assert!((g.variance() - 1.6875).abs() < 1e-12);
    }

    #[test]
    fn first_update_only_seeds() {
        let mut g = TimeWeighted::new();
        g.update_to(SimTime(5.0), 3.0);
        assert_eq!(g.area(), 0.0);
        assert_eq!(g.level(), 3.0);
        assert_eq!(g.mean(), 3.0);
        assert_eq!(g.min(), 3.0);
        assert_eq!(g.max(), 3.0);
    }

    #[test]
    fn reset_keeps_level_zeroes_accumulators() {
        let mut g = TimeWeighted::new();
        g.update_to(SimTime(0.0), 2.0);
        g.update_to(SimTime(10.0), 7.0);
        let live = g.level();
        g.reset(SimTime(10.0), live);
        assert_eq!(g.level(), 7.0);
        assert_eq!(g.area(), 0.0);
        assert_eq!(g.variance(), 0.0);
        // Accumulation restarts from the reset instant.
        g.flush(SimTime(12.0));
        assert!((g.area() - 14.0).abs() < 1e-12);
        assert!((g.mean() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn increase_decrease_sugar() {
        let mut g = TimeWeighted::new();
        g.update_to(SimTime(0.0), 0.0);
        g.increase(SimTime(1.0), 1.0);
        g.increase(SimTime(2.0), 1.0);
        g.decrease(SimTime(3.0), 1.0);
        assert_eq!(g.level(), 1.0);
        // Areas: 0·1 + 1·1 + 2·1 = 3.
        g.flush(SimTime(3.0));
        assert!((g.area() - 3.0).abs() < 1e-12);
        assert_eq!(g.max(), 2.0);
    }

    #[test]
    fn zero_elapsed_updates_accumulate_nothing() {
        let mut g = TimeWeighted::new();
        g.update_to(SimTime(1.0), 4.0);
        g.update_to(SimTime(1.0), 9.0);
        assert_eq!(g.area(), 0.0);
        assert_eq!(g.level(), 9.0);
        assert_eq!(g.max(), 9.0);
    }
}
