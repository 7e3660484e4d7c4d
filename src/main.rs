//! cdds - close-distance duration similarity of trajectory pairs.
//!
//! Usage:
//!     cdds --threshold 3.0 "4 0 0 0 10 0 10 20 0 20 30 0 30" "5 2 2 1 5 5 5 15 5 15 25 -5 28 35 5 35"
//!     cdds --threshold 3.0 --input pairs.txt
//!     cdds --config cdds.toml --input pairs.txt --stats

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cdds_rs::{Cdds, CddsConfig, Trajectory, TrajectoryFileParser};

/// Compute the close-distance duration of trajectory pairs.
///
/// Trajectories use the record format `N x1 y1 t1 ... xN yN tN`. Records are
/// consumed two at a time; one duration is printed per pair.
#[derive(Parser, Debug)]
#[command(name = "cdds", version, about)]
struct Cli {
    /// Distance threshold (overrides the config file)
    #[arg(short, long, allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Solver tolerance (overrides the config file)
    #[arg(long)]
    epsilon: Option<f64>,

    /// TOML file with `distance_threshold` and optional `epsilon`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File of trajectory records
    #[arg(short, long, conflicts_with = "records")]
    input: Option<PathBuf>,

    /// Trajectory records given inline
    records: Vec<String>,

    /// Also print solver call and overlap counts per pair
    #[arg(long)]
    stats: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let cdds = Cdds::new(config).context("invalid configuration")?;
    debug!(?config, "configuration loaded");

    let trajectories = load_trajectories(&cli)?;
    check_trajectory_count(trajectories.len())?;

    for (pair, chunk) in trajectories.chunks_exact(2).enumerate() {
        let (t1, t2) = (&chunk[0], &chunk[1]);
        debug!(pair, %t1, %t2, "computing pair");

        let report = cdds.sweep(t1, t2);
        if cli.stats {
            println!(
                "{} {} {}",
                report.duration, report.solver_calls, report.overlapping_pairs
            );
        } else {
            println!("{}", report.duration);
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<CddsConfig> {
    let from_file = match &cli.config {
        Some(path) => Some(read_config(path)?),
        None => None,
    };
    merge_config(from_file, cli.threshold, cli.epsilon)
}

fn read_config(path: &Path) -> anyhow::Result<CddsConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    toml::from_str::<CddsConfig>(&text)
        .with_context(|| format!("failed to parse config '{}'", path.display()))
}

/// Apply command-line overrides on top of the config file, if any.
fn merge_config(
    from_file: Option<CddsConfig>,
    threshold: Option<f64>,
    epsilon: Option<f64>,
) -> anyhow::Result<CddsConfig> {
    let mut config = match (from_file, threshold) {
        (Some(config), _) => config,
        (None, Some(threshold)) => CddsConfig::new(threshold),
        (None, None) => bail!("either --threshold or --config is required"),
    };

    if let Some(threshold) = threshold {
        config.distance_threshold = threshold;
    }
    if let Some(epsilon) = epsilon {
        config.epsilon = epsilon;
    }
    Ok(config)
}

fn check_trajectory_count(count: usize) -> anyhow::Result<()> {
    if count < 2 {
        bail!("need at least two trajectories, got {}", count);
    }
    if count % 2 == 1 {
        warn!(count, "odd number of trajectories, ignoring the last one");
    }
    Ok(())
}

fn load_trajectories(cli: &Cli) -> anyhow::Result<Vec<Trajectory>> {
    if let Some(path) = &cli.input {
        let parser = TrajectoryFileParser::new(path)?;
        return Ok(parser.into_trajectories());
    }

    cli.records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record
                .parse::<Trajectory>()
                .with_context(|| format!("invalid trajectory record #{}", i + 1))
        })
        .collect()
}
