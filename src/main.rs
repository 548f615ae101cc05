//! gacha-sim command line
//!
//! Usage:
//!   gacha-sim --config config.json [OPTIONS]
//!
//! Writes `results_{config}_full.csv` and `results_{config}_no_samples.csv`
//! into the output directory and prints a text summary.

use clap::Parser;
use gacha_sim::build_info::BUILD_VERSION;
use gacha_sim::logging::init_logging;
use gacha_sim::simulator::{
    run_simulation_with_observer, Extrapolation, HeaderLabels, ProgressLog, ReportPaths,
    SimConfig,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "gacha-sim", version = BUILD_VERSION, about = "Simulate draws against a pity probability curve")]
struct Args {
    /// Path to your config.json file
    #[arg(short, long)]
    config: PathBuf,

    /// RNG seed (overrides the config's seed)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of trials (overrides the config's num_trials)
    #[arg(short = 'n', long)]
    trials: Option<u64>,

    /// Directory the CSV reports are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Hold the first control point's probability for earlier draws
    #[arg(long)]
    clamp_below_first: bool,

    /// Write English column headers instead of the default labels
    #[arg(long)]
    english_headers: bool,

    /// Also write a JSON report to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Only log warnings and errors, skip the text summary
    #[arg(short, long)]
    quiet: bool,
}

fn run(args: &Args) -> gacha_sim::Result<()> {
    let mut config = SimConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(trials) = args.trials {
        config.num_trials = trials;
    }
    if args.clamp_below_first {
        config.extrapolation = Extrapolation::Clamp;
    }
    config.validate()?;

    let table = config.build_table()?;
    let distribution = table.stopping_distribution();
    if distribution.failure_probability() > 0.0 {
        warn!(
            "probability table ends at {} without reaching 1.0; a trial fails with chance {:.6}",
            table.final_probability(),
            distribution.failure_probability()
        );
    }

    info!(
        "Running {} trials over {} draws (seed={:?})",
        config.num_trials,
        table.maximum_draws(),
        config.seed
    );

    let mut progress = ProgressLog::default();
    let report = run_simulation_with_observer(&config, &mut progress)?;

    fs::create_dir_all(&args.out_dir)?;
    let paths = ReportPaths::for_config(&args.out_dir, &args.config);
    let labels = if args.english_headers {
        HeaderLabels::English
    } else {
        HeaderLabels::Chinese
    };
    report.write_csv_files(&paths, labels)?;
    info!("Wrote {}", paths.full.display());
    info!("Wrote {}", paths.summary.display());

    if let Some(json_path) = &args.json {
        fs::write(json_path, report.to_json())?;
        info!("Wrote {}", json_path.display());
    }

    if !args.quiet {
        println!("{}", report.to_text());
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(if args.quiet { "warn" } else { "info" });
    debug!("gacha-sim {BUILD_VERSION}");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
