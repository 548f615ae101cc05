//! Per-draw-count tallies produced by an aggregation run.

use super::table::ProbabilityTable;

/// Trials that succeeded at one particular draw count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultBucket {
    pub count: u64,
    /// 1-based trial indices, in execution order.
    pub sample_indices: Vec<u64>,
}

impl ResultBucket {
    fn record(&mut self, trial: u64) {
        self.count += 1;
        self.sample_indices.push(trial);
    }
}

/// One bucket per draw count in `[1, maximum_draws]`, empty ones included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    buckets: Vec<ResultBucket>,
    num_trials: u64,
}

impl ResultTable {
    pub(crate) fn new(maximum_draws: u32) -> Self {
        Self {
            buckets: vec![ResultBucket::default(); maximum_draws as usize],
            num_trials: 0,
        }
    }

    /// Tally trial `trial` as a success at draw `n`.
    pub(crate) fn record(&mut self, n: u32, trial: u64) {
        // n comes from a trial bounded by maximum_draws
        self.buckets[(n - 1) as usize].record(trial);
        self.num_trials += 1;
    }

    pub fn maximum_draws(&self) -> u32 {
        self.buckets.len() as u32
    }

    pub fn num_trials(&self) -> u64 {
        self.num_trials
    }

    pub fn bucket(&self, n: u32) -> Option<&ResultBucket> {
        n.checked_sub(1).and_then(|i| self.buckets.get(i as usize))
    }

    /// `(draw_count, bucket)` pairs in ascending draw count.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &ResultBucket)> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| (i as u32 + 1, bucket))
    }

    /// Share of all trials that succeeded exactly at draw `n`.
    pub fn frequency(&self, n: u32) -> f64 {
        match self.bucket(n) {
            Some(bucket) if self.num_trials > 0 => bucket.count as f64 / self.num_trials as f64,
            _ => 0.0,
        }
    }

    /// Mean draw count over all recorded trials.
    pub fn mean_draws(&self) -> f64 {
        if self.num_trials == 0 {
            return 0.0;
        }
        let total: u64 = self.iter().map(|(n, b)| n as u64 * b.count).sum();
        total as f64 / self.num_trials as f64
    }

    /// Draw count with the most successes (lowest on ties).
    pub fn mode(&self) -> Option<u32> {
        self.iter()
            .filter(|(_, b)| b.count > 0)
            .max_by(|(na, a), (nb, b)| a.count.cmp(&b.count).then(nb.cmp(na)))
            .map(|(n, _)| n)
    }

    /// Report rows, pairing each bucket with the curve's probability at `n`.
    pub fn rows<'a>(
        &'a self,
        table: &'a ProbabilityTable,
    ) -> impl Iterator<Item = ReportRow<'a>> + 'a {
        self.iter().map(move |(n, bucket)| ReportRow {
            draw_count: n,
            probability: table.probability_at(n),
            frequency: self.frequency(n),
            count: bucket.count,
            samples: &bucket.sample_indices,
        })
    }
}

/// Read-only view of one draw count for the reporting layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRow<'a> {
    pub draw_count: u32,
    pub probability: f64,
    pub frequency: f64,
    pub count: u64,
    pub samples: &'a [u64],
}
