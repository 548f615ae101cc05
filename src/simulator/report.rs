//! Simulation report generation: CSV files, JSON and a text summary.

use super::results::{ReportRow, ResultTable};
use super::table::ProbabilityTable;
use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column headers for the CSV reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderLabels {
    /// The labels the tool has always written.
    #[default]
    Chinese,
    English,
}

impl HeaderLabels {
    fn columns(self) -> [&'static str; 5] {
        match self {
            HeaderLabels::Chinese => [
                "抽数",
                "该抽出金的概率",
                "刚好在该抽出金的概率",
                "该抽出金的样本数量",
                "该抽出金的样本号",
            ],
            HeaderLabels::English => ["draw", "probability", "exact_frequency", "count", "samples"],
        }
    }
}

/// Where the two CSV reports for one config end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub full: PathBuf,
    pub summary: PathBuf,
}

impl ReportPaths {
    /// `results_{stem}_full.csv` and `results_{stem}_no_samples.csv` in `out_dir`.
    pub fn new(out_dir: &Path, stem: &str) -> Self {
        Self {
            full: out_dir.join(format!("results_{stem}_full.csv")),
            summary: out_dir.join(format!("results_{stem}_no_samples.csv")),
        }
    }

    /// Paths named after the config file's stem.
    pub fn for_config(out_dir: &Path, config_path: &Path) -> Self {
        let stem = config_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("config");
        Self::new(out_dir, stem)
    }
}

/// Completed run: the curve it used and the per-draw tallies.
#[derive(Debug, Clone)]
pub struct SimReport {
    table: ProbabilityTable,
    results: ResultTable,
}

impl SimReport {
    pub fn new(table: ProbabilityTable, results: ResultTable) -> Self {
        Self { table, results }
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    pub fn results(&self) -> &ResultTable {
        &self.results
    }

    pub fn num_trials(&self) -> u64 {
        self.results.num_trials()
    }

    pub fn rows(&self) -> impl Iterator<Item = ReportRow<'_>> {
        self.results.rows(&self.table)
    }

    /// One row per draw count, including the trial indices.
    pub fn write_full_csv(&self, w: &mut impl Write, labels: HeaderLabels) -> io::Result<()> {
        write_csv_record(w, &labels.columns())?;
        for row in self.rows() {
            let samples = row
                .samples
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            write_csv_record(
                w,
                &[
                    row.draw_count.to_string(),
                    format_float(row.probability),
                    format_float(row.frequency),
                    row.count.to_string(),
                    samples,
                ],
            )?;
        }
        Ok(())
    }

    /// Same as the full report without the trial index column.
    pub fn write_summary_csv(&self, w: &mut impl Write, labels: HeaderLabels) -> io::Result<()> {
        write_csv_record(w, &labels.columns()[..4])?;
        for row in self.rows() {
            write_csv_record(
                w,
                &[
                    row.draw_count.to_string(),
                    format_float(row.probability),
                    format_float(row.frequency),
                    row.count.to_string(),
                ],
            )?;
        }
        Ok(())
    }

    /// Write both CSV reports to `paths`.
    pub fn write_csv_files(&self, paths: &ReportPaths, labels: HeaderLabels) -> Result<()> {
        let mut full = BufWriter::new(File::create(&paths.full)?);
        self.write_full_csv(&mut full, labels)?;
        full.flush()?;

        let mut summary = BufWriter::new(File::create(&paths.summary)?);
        self.write_summary_csv(&mut summary, labels)?;
        summary.flush()?;

        Ok(())
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let distribution = self.table.stopping_distribution();
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                     GACHA DRAW REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Trials: {}  |  Maximum draws: {}\n\n",
            self.num_trials(),
            self.table.maximum_draws()
        ));

        report.push_str("── DRAWS TO SUCCESS ─────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Mean (simulated):    {:.3}\n",
            self.results.mean_draws()
        ));
        match distribution.expected_draws() {
            Some(expected) => {
                report.push_str(&format!("  Mean (theoretical):  {expected:.3}\n"));
            }
            None => report.push_str("  Mean (theoretical):  n/a\n"),
        }
        if let Some(mode) = self.results.mode() {
            report.push_str(&format!("  Most common draw:    {mode}\n"));
        }
        report.push_str(&format!(
            "  Failure chance:      {:.6}%\n\n",
            distribution.failure_probability() * 100.0
        ));

        report.push_str("── PER-DRAW BREAKDOWN ───────────────────────────────────────────\n");
        report.push_str("  Draw   Curve p    Expected   Observed     Count\n");
        report.push_str("  ────   ───────    ────────   ────────     ─────\n");
        for row in self.rows().filter(|r| r.count > 0) {
            report.push_str(&format!(
                "  {:4}   {:7.4}    {:8.5}   {:8.5}   {:7}\n",
                row.draw_count,
                row.probability,
                distribution.mass_at(row.draw_count),
                row.frequency,
                row.count
            ));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Serialize)]
struct JsonRow {
    draw_count: u32,
    probability: f64,
    theoretical_mass: f64,
    frequency: f64,
    count: u64,
}

impl Serialize for SimReport {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let distribution = self.table.stopping_distribution();
        let rows: Vec<JsonRow> = self
            .rows()
            .map(|row| JsonRow {
                draw_count: row.draw_count,
                probability: row.probability,
                theoretical_mass: distribution.mass_at(row.draw_count),
                frequency: row.frequency,
                count: row.count,
            })
            .collect();

        let mut state = serializer.serialize_struct("SimReport", 6)?;
        state.serialize_field("num_trials", &self.num_trials())?;
        state.serialize_field("maximum_draws", &self.table.maximum_draws())?;
        state.serialize_field("mean_draws", &self.results.mean_draws())?;
        state.serialize_field("expected_draws", &distribution.expected_draws())?;
        state.serialize_field("failure_probability", &distribution.failure_probability())?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

/// Shortest round-trip form, keeping a trailing `.0` on whole numbers.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn write_csv_record(w: &mut impl Write, fields: &[impl AsRef<str>]) -> io::Result<()> {
    let line = fields
        .iter()
        .map(|f| escape_csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    write!(w, "{line}\r\n")
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
