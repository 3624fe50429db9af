//! Experiment runner and reporting sink
//!
//! Parses the numeric experiment parameters, then loops forever: run a
//! batch of independent calibrated simulations, merge the samples, and
//! periodically emit the aggregate rows to stdout. Diagnostics go through
//! the logger; stdout carries only the data rows.
//!
//! The process has no natural termination; it runs until stopped
//! externally. The core library supports a cancellation flag checked
//! between batches; this binary passes `None`.

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use callcenter_simulator_core::{
    ArrivalConfig, CalibrationConfig, ExperimentConfig, ExperimentHarness, ResultTable,
    SamplingMode, DEFAULT_CALLBACK_DELAYS,
};

/// Which outcome to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Remaining wait given survival to each patience value
    Remaining,
    /// Extra wait caused by hanging up and calling back
    Callback,
}

/// Monte Carlo study of call-center wait times
#[derive(Parser, Debug)]
#[command(name = "callsim")]
#[command(about = "Expected remaining wait vs. hanging up and calling back")]
#[command(version)]
struct Args {
    /// Number of agents serving the queue
    #[arg(long, default_value_t = 5)]
    agents: usize,

    /// Target steady-state median wait (minutes)
    #[arg(long, default_value_t = 5.0)]
    target_median: f64,

    /// Mean talk duration (minutes)
    #[arg(long, default_value_t = 5.0)]
    mean_talk: f64,

    /// Arrival horizon (minutes)
    #[arg(long, default_value_t = 100_000.0)]
    horizon: f64,

    /// Largest patience value sampled (inclusive, minutes)
    #[arg(long, default_value_t = 80)]
    patience_max: u32,

    /// Sampling mode
    #[arg(long, value_enum, default_value = "remaining")]
    mode: Mode,

    /// Callback delays in minutes (callback mode; comma-separated)
    #[arg(long, value_delimiter = ',')]
    delays: Option<Vec<u32>>,

    /// Random call draws per calibrated set
    #[arg(long, default_value_t = 1000)]
    samples_per_run: usize,

    /// Parallel simulation tasks per batch
    #[arg(long, default_value_t = 20)]
    batch_size: usize,

    /// Per-bucket sample cap
    #[arg(long, default_value_t = 1_000_000)]
    bucket_cap: usize,

    /// Batches between reports
    #[arg(long, default_value_t = 25)]
    report_every: u64,

    /// Calibration round cap
    #[arg(long, default_value_t = 10_000)]
    max_rounds: usize,

    /// Base RNG seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mode = match args.mode {
        Mode::Remaining => SamplingMode::RemainingWait,
        Mode::Callback => SamplingMode::Callback {
            delays: args
                .delays
                .clone()
                .unwrap_or_else(|| DEFAULT_CALLBACK_DELAYS.to_vec()),
        },
    };

    let config = ExperimentConfig {
        calibration: CalibrationConfig {
            agent_count: args.agents,
            median_wait_target: args.target_median,
            arrivals: ArrivalConfig {
                horizon_minutes: args.horizon,
                mean_talk_minutes: args.mean_talk,
            },
            max_rounds: args.max_rounds,
        },
        patience_max: args.patience_max,
        samples_per_run: args.samples_per_run,
        batch_size: args.batch_size,
        bucket_cap: args.bucket_cap,
        mode: mode.clone(),
        rng_seed: args.seed,
    };

    let mut harness = match ExperimentHarness::new(config) {
        Ok(harness) => harness,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let report_every = args.report_every.max(1);
    let result = harness.run_with_progress(None, |table, summary| {
        if summary.batch % report_every == 0 {
            report(table, &mode);
        }
    });

    // Only reachable on error: the loop itself has no natural termination.
    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// Emit the periodic aggregate rows: a header naming the callback delays
/// (callback mode only), one CSV row per bucket, and the totals line.
fn report(table: &mut ResultTable, mode: &SamplingMode) {
    if let SamplingMode::Callback { delays } = mode {
        let list = delays
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        println!("delays,{list}");
    }

    for row in table.rows() {
        match row.key.callback_delay {
            Some(delay) => println!(
                "{},{},{:.4},{:.4},{}",
                row.key.patience, delay, row.average, row.median, row.count
            ),
            None => println!(
                "{},{:.4},{:.4},{}",
                row.key.patience, row.average, row.median, row.count
            ),
        }
    }

    let totals = table.totals();
    println!(
        "# observed={} stored={} min_bucket={} max_bucket={}",
        totals.observed, totals.stored, totals.min_bucket, totals.max_bucket
    );
}
