//! Monte Carlo aggregation over many independent trials.
//!
//! Trials run sequentially so that sample indices record the 1-based order in
//! which trials were executed. Progress is reported through a
//! [`TrialObserver`], never by exposing the partially filled table.

use super::config::SimConfig;
use super::draw::DrawSimulator;
use super::report::SimReport;
use super::results::ResultTable;
use super::table::ProbabilityTable;
use crate::error::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

/// Notified after every successful trial.
pub trait TrialObserver {
    fn on_trial(&mut self, trial: u64, draws: u32, num_trials: u64);
}

impl<F: FnMut(u64, u32, u64)> TrialObserver for F {
    fn on_trial(&mut self, trial: u64, draws: u32, num_trials: u64) {
        self(trial, draws, num_trials)
    }
}

/// Logs progress at `info` every `step_percent` of the run.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    step_percent: u64,
    next_percent: u64,
}

impl ProgressLog {
    pub fn new(step_percent: u64) -> Self {
        let step_percent = step_percent.clamp(1, 100);
        Self {
            step_percent,
            next_percent: step_percent,
        }
    }
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self::new(10)
    }
}

impl TrialObserver for ProgressLog {
    fn on_trial(&mut self, trial: u64, _draws: u32, num_trials: u64) {
        let percent = trial.saturating_mul(100) / num_trials.max(1);
        if percent >= self.next_percent {
            info!("Running simulations: {percent}% ({trial}/{num_trials})");
            while self.next_percent <= percent {
                self.next_percent += self.step_percent;
            }
        }
    }
}

/// Drives many [`DrawSimulator`] trials and tallies where each one stopped.
#[derive(Debug, Clone, Copy)]
pub struct TrialAggregator<'a> {
    simulator: DrawSimulator<'a>,
}

impl<'a> TrialAggregator<'a> {
    pub fn new(table: &'a ProbabilityTable) -> Self {
        Self {
            simulator: DrawSimulator::new(table),
        }
    }

    pub fn run(&self, num_trials: u64, rng: &mut impl Rng) -> Result<ResultTable> {
        self.run_with_observer(num_trials, rng, &mut |_: u64, _: u32, _: u64| {})
    }

    /// Run `num_trials` trials in order, aborting on the first trial that
    /// exhausts the table.
    pub fn run_with_observer(
        &self,
        num_trials: u64,
        rng: &mut impl Rng,
        observer: &mut impl TrialObserver,
    ) -> Result<ResultTable> {
        if num_trials == 0 {
            return Err(Error::InvalidConfig(
                "num_trials must be at least 1".to_string(),
            ));
        }

        let maximum_draws = self.simulator.table().maximum_draws();
        let mut results = ResultTable::new(maximum_draws);
        debug!(num_trials, maximum_draws, "starting trials");

        for trial in 1..=num_trials {
            let n = self
                .simulator
                .run_trial(rng)
                .map_err(|e| Error::DrawLimitExceeded {
                    trial,
                    maximum_draws: e.maximum_draws,
                })?;
            trace!(trial, draws = n, "trial finished");

            results.record(n, trial);
            observer.on_trial(trial, n, num_trials);
        }

        debug!(num_trials, "all trials finished");
        Ok(results)
    }
}

/// Build the table from `config`, run every trial and wrap the outcome in a
/// report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport> {
    run_simulation_with_observer(config, &mut |_: u64, _: u32, _: u64| {})
}

pub fn run_simulation_with_observer(
    config: &SimConfig,
    observer: &mut impl TrialObserver,
) -> Result<SimReport> {
    let table = config.build_table()?;

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let results = TrialAggregator::new(&table).run_with_observer(
        config.num_trials,
        &mut rng,
        observer,
    )?;

    Ok(SimReport::new(table, results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::table::ControlPoint;

    fn table(points: &[(u32, f64)]) -> ProbabilityTable {
        ProbabilityTable::new(points.iter().copied().map(ControlPoint::from).collect()).unwrap()
    }

    #[test]
    fn test_certain_table_fills_first_bucket() {
        let t = table(&[(1, 1.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let results = TrialAggregator::new(&t).run(1000, &mut rng).unwrap();

        let bucket = results.bucket(1).unwrap();
        assert_eq!(bucket.count, 1000);
        assert_eq!(bucket.sample_indices, (1..=1000).collect::<Vec<u64>>());
        assert_eq!(results.frequency(1), 1.0);
    }

    #[test]
    fn test_counts_sum_to_num_trials() {
        let t = table(&[(1, 0.006), (73, 0.006), (90, 1.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let results = TrialAggregator::new(&t).run(5_000, &mut rng).unwrap();

        assert_eq!(results.maximum_draws(), 90);
        let total: u64 = results.iter().map(|(_, b)| b.count).sum();
        assert_eq!(total, 5_000);
        assert_eq!(results.num_trials(), 5_000);
    }

    #[test]
    fn test_sample_indices_partition_trials() {
        let t = table(&[(1, 0.1), (10, 0.5), (20, 1.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(555);
        let results = TrialAggregator::new(&t).run(2_000, &mut rng).unwrap();

        let mut all: Vec<u64> = Vec::new();
        for (_, bucket) in results.iter() {
            assert_eq!(bucket.count as usize, bucket.sample_indices.len());
            assert!(bucket.sample_indices.windows(2).all(|w| w[0] < w[1]));
            all.extend_from_slice(&bucket.sample_indices);
        }
        all.sort_unstable();
        assert_eq!(all, (1..=2_000).collect::<Vec<u64>>());
    }

    #[test]
    fn test_draw_limit_aborts_run() {
        let t = table(&[(1, 0.0), (5, 0.5)]);
        let mut rng = ChaCha8Rng::seed_from_u64(777);
        let err = TrialAggregator::new(&t).run(1_000, &mut rng).unwrap_err();
        match err {
            Error::DrawLimitExceeded {
                trial,
                maximum_draws,
            } => {
                assert!((1..=1_000).contains(&trial));
                assert_eq!(maximum_draws, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_trials_rejected() {
        let t = table(&[(1, 1.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            TrialAggregator::new(&t).run(0, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_observer_sees_every_trial_in_order() {
        let t = table(&[(1, 0.3), (8, 1.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut seen = Vec::new();
        let results = TrialAggregator::new(&t)
            .run_with_observer(50, &mut rng, &mut |trial: u64, draws: u32, total: u64| {
                assert_eq!(total, 50);
                seen.push((trial, draws));
            })
            .unwrap();

        assert_eq!(seen.len(), 50);
        for (i, (trial, draws)) in seen.iter().enumerate() {
            assert_eq!(*trial, i as u64 + 1);
            assert!(results.bucket(*draws).unwrap().sample_indices.contains(trial));
        }
    }

    #[test]
    fn test_progress_log_advances_in_steps() {
        let mut progress = ProgressLog::new(25);
        for trial in 1..=8 {
            progress.on_trial(trial, 1, 8);
        }
        assert!(progress.next_percent > 100);
    }

    #[test]
    fn test_seeded_simulation_is_reproducible() {
        let config = SimConfig {
            probability_table: vec![ControlPoint::new(1, 0.05), ControlPoint::new(30, 1.0)],
            num_trials: 500,
            seed: Some(2024),
            ..Default::default()
        };
        let a = run_simulation(&config).unwrap();
        let b = run_simulation(&config).unwrap();
        assert_eq!(a.results(), b.results());
    }
}
