//! Gacha draw simulator for Monte Carlo analysis.
//!
//! Run many independent trials against a probability curve to see:
//! - How often each draw count ends a trial
//! - How the observed frequencies compare with the curve's exact distribution
//! - Whether the curve can run out of draws before a success
//!
//! Data flows config → [`ProbabilityTable`] → [`DrawSimulator`] →
//! [`TrialAggregator`] → [`ResultTable`] → [`SimReport`].

mod config;
mod draw;
mod report;
mod results;
mod runner;
mod table;

pub use config::SimConfig;
pub use draw::{DrawLimitExceeded, DrawSimulator};
pub use report::{HeaderLabels, ReportPaths, SimReport};
pub use results::{ReportRow, ResultBucket, ResultTable};
pub use runner::{
    run_simulation, run_simulation_with_observer, ProgressLog, TrialAggregator, TrialObserver,
};
pub use table::{ControlPoint, Extrapolation, ProbabilityTable, StoppingDistribution};
