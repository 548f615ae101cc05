//! Probability curve over sparse control points.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A (draw count, success probability) pair on the curve.
///
/// Serialized as a two-element array, e.g. `[73, 0.006]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(u32, f64)", into = "(u32, f64)")]
pub struct ControlPoint {
    pub draw_count: u32,
    pub probability: f64,
}

impl ControlPoint {
    pub fn new(draw_count: u32, probability: f64) -> Self {
        Self {
            draw_count,
            probability,
        }
    }
}

impl From<(u32, f64)> for ControlPoint {
    fn from((draw_count, probability): (u32, f64)) -> Self {
        Self::new(draw_count, probability)
    }
}

impl From<ControlPoint> for (u32, f64) {
    fn from(point: ControlPoint) -> Self {
        (point.draw_count, point.probability)
    }
}

/// How draws before the first control point are answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolation {
    /// Continue the first segment's slope backwards.
    #[default]
    Linear,
    /// Hold the first control point's probability.
    Clamp,
}

/// Immutable piecewise-linear probability curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    points: Vec<ControlPoint>,
    extrapolation: Extrapolation,
}

impl ProbabilityTable {
    /// Build a table, rejecting empty input, non-increasing or zero draw
    /// counts, and probabilities outside [0, 1].
    pub fn new(points: Vec<ControlPoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidTable(
                "at least one control point is required".to_string(),
            ));
        }

        for (i, point) in points.iter().enumerate() {
            if point.draw_count == 0 {
                return Err(Error::InvalidTable(format!(
                    "control point {} has draw count 0; draw counts start at 1",
                    i + 1
                )));
            }
            if !(0.0..=1.0).contains(&point.probability) {
                return Err(Error::InvalidTable(format!(
                    "control point {} has probability {} outside [0, 1]",
                    i + 1,
                    point.probability
                )));
            }
        }

        if let Some(pair) = points
            .windows(2)
            .find(|pair| pair[1].draw_count <= pair[0].draw_count)
        {
            return Err(Error::InvalidTable(format!(
                "draw counts must be strictly increasing, found {} followed by {}",
                pair[0].draw_count, pair[1].draw_count
            )));
        }

        Ok(Self {
            points,
            extrapolation: Extrapolation::default(),
        })
    }

    /// Same table with a different policy below the first control point.
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Draw count of the last control point; no trial may go beyond it.
    pub fn maximum_draws(&self) -> u32 {
        self.last().draw_count
    }

    /// Probability the curve settles at from `maximum_draws` on.
    pub fn final_probability(&self) -> f64 {
        self.last().probability
    }

    fn first(&self) -> &ControlPoint {
        &self.points[0]
    }

    fn last(&self) -> &ControlPoint {
        &self.points[self.points.len() - 1]
    }

    /// Interpolated success probability at draw `n`.
    ///
    /// Flat beyond the last control point. Below the first control point the
    /// result depends on [`Extrapolation`]; with `Linear` it can leave [0, 1].
    pub fn probability_at(&self, n: u32) -> f64 {
        if self.extrapolation == Extrapolation::Clamp && n < self.first().draw_count {
            return self.first().probability;
        }

        for pair in self.points.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if n < hi.draw_count {
                let offset = n as f64 - lo.draw_count as f64;
                let span = (hi.draw_count - lo.draw_count) as f64;
                return lo.probability + (hi.probability - lo.probability) * offset / span;
            }
        }

        self.last().probability
    }

    /// `probability_at(n)` limited to what a uniform draw in [0, 1) can realize.
    pub fn effective_probability_at(&self, n: u32) -> f64 {
        self.probability_at(n).clamp(0.0, 1.0)
    }

    /// Exact first-success distribution implied by the curve.
    pub fn stopping_distribution(&self) -> StoppingDistribution {
        let maximum_draws = self.maximum_draws();
        let mut mass = Vec::with_capacity(maximum_draws as usize);
        let mut survival = 1.0;

        for n in 1..=maximum_draws {
            let p = self.effective_probability_at(n);
            mass.push(survival * p);
            survival *= 1.0 - p;
        }

        StoppingDistribution {
            mass,
            failure_probability: survival,
        }
    }
}

/// Probability of first success at each draw count, plus the leftover chance
/// of running past `maximum_draws`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoppingDistribution {
    /// `mass[n - 1]` is the probability of succeeding exactly at draw `n`.
    mass: Vec<f64>,
    failure_probability: f64,
}

impl StoppingDistribution {
    pub fn mass_at(&self, n: u32) -> f64 {
        n.checked_sub(1)
            .and_then(|i| self.mass.get(i as usize))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn masses(&self) -> &[f64] {
        &self.mass
    }

    /// Chance a single trial ends in `DrawLimitExceeded`.
    pub fn failure_probability(&self) -> f64 {
        self.failure_probability
    }

    /// Mean draw count of a successful trial, `None` if success is impossible.
    pub fn expected_draws(&self) -> Option<f64> {
        let success: f64 = self.mass.iter().sum();
        if success <= 0.0 {
            return None;
        }
        let weighted: f64 = self
            .mass
            .iter()
            .enumerate()
            .map(|(i, m)| (i + 1) as f64 * m)
            .sum();
        Some(weighted / success)
    }
}
