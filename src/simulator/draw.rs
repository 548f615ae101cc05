//! Single-trial draw simulation.

use super::table::ProbabilityTable;
use rand::Rng;
use std::fmt;

/// A trial used up every draw in the table without a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawLimitExceeded {
    pub maximum_draws: u32,
}

impl fmt::Display for DrawLimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no success within the maximum of {} draws",
            self.maximum_draws
        )
    }
}

impl std::error::Error for DrawLimitExceeded {}

/// Runs one trial at a time against a borrowed probability table.
#[derive(Debug, Clone, Copy)]
pub struct DrawSimulator<'a> {
    table: &'a ProbabilityTable,
}

impl<'a> DrawSimulator<'a> {
    pub fn new(table: &'a ProbabilityTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a ProbabilityTable {
        self.table
    }

    /// Draw until success and return the draw count it happened on.
    ///
    /// Each draw compares a fresh uniform value in [0, 1) from `rng` against
    /// `probability_at(n)`.
    pub fn run_trial(&self, rng: &mut impl Rng) -> Result<u32, DrawLimitExceeded> {
        let maximum_draws = self.table.maximum_draws();
        let mut n = 1;

        loop {
            if n > maximum_draws {
                return Err(DrawLimitExceeded { maximum_draws });
            }

            let r = rng.gen::<f64>();
            if r < self.table.probability_at(n) {
                return Ok(n);
            }

            n += 1;
        }
    }
}
