//! Property-based tests for the probability curve and single trials.

use gacha_sim::simulator::{ControlPoint, DrawSimulator, ProbabilityTable};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Strategy: a monotone table with strictly increasing draw counts.
fn monotone_table_strategy() -> impl Strategy<Value = Vec<ControlPoint>> {
    prop::collection::vec((1u32..20, 0.0f64..=1.0), 1..8).prop_map(|steps| {
        let mut probabilities: Vec<f64> = steps.iter().map(|&(_, p)| p).collect();
        probabilities.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mut draw_count = 0;
        steps
            .iter()
            .zip(probabilities)
            .map(|(&(gap, _), p)| {
                draw_count += gap;
                ControlPoint::new(draw_count, p)
            })
            .collect()
    })
}

/// Strategy: a monotone table whose last point guarantees success.
fn guaranteed_table_strategy() -> impl Strategy<Value = Vec<ControlPoint>> {
    monotone_table_strategy().prop_map(|mut points| {
        if let Some(last) = points.last_mut() {
            last.probability = 1.0;
        }
        points
    })
}

proptest! {
    // 1. Flat tail at and beyond the last control point
    #[test]
    fn flat_tail(points in monotone_table_strategy(), extra in 0u32..100) {
        let table = ProbabilityTable::new(points.clone()).unwrap();
        let last = points.last().unwrap();
        prop_assert_eq!(table.probability_at(last.draw_count + extra), last.probability);
    }

    // 2. Interpolated values stay between their control points
    #[test]
    fn interpolation_is_bracketed(points in monotone_table_strategy()) {
        let table = ProbabilityTable::new(points.clone()).unwrap();
        for pair in points.windows(2) {
            for n in pair[0].draw_count..pair[1].draw_count {
                let p = table.probability_at(n);
                prop_assert!(p >= pair[0].probability - 1e-12, "n={n} p={p}");
                prop_assert!(p <= pair[1].probability + 1e-12, "n={n} p={p}");
            }
        }
    }

    // 3. Control points are reproduced exactly
    #[test]
    fn control_points_are_exact(points in monotone_table_strategy()) {
        let table = ProbabilityTable::new(points.clone()).unwrap();
        for point in &points {
            prop_assert_eq!(table.probability_at(point.draw_count), point.probability);
        }
    }

    // 4. Stopping masses and failure chance form a distribution
    #[test]
    fn stopping_distribution_sums_to_one(points in monotone_table_strategy()) {
        let dist = ProbabilityTable::new(points).unwrap().stopping_distribution();
        let total: f64 = dist.masses().iter().sum::<f64>() + dist.failure_probability();
        prop_assert!((total - 1.0).abs() < 1e-9, "total={total}");
        prop_assert!(dist.masses().iter().all(|&m| (0.0..=1.0).contains(&m)));
    }

    // 5. Guaranteed tables always end a trial inside [1, maximum_draws]
    #[test]
    fn trial_stays_in_range(points in guaranteed_table_strategy(), seed in any::<u64>()) {
        let table = ProbabilityTable::new(points).unwrap();
        let sim = DrawSimulator::new(&table);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..20 {
            let n = sim.run_trial(&mut rng).unwrap();
            prop_assert!(n >= 1 && n <= table.maximum_draws());
        }
    }
}
