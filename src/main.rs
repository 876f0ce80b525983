// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Concentric-ring grid sweep.
//!
//! Evaluates the logical error rate of a distance-3 surface-code memory for
//! every (ring count, cat-pump strength) pair of the configured grid and
//! writes `epsilon_log.csv` and `grid_sweep.png` to the output directory.
//!
//! # Usage
//!
//! ```bash
//! # Default grid, 10000 shots per point
//! grid-sweep
//!
//! # Fewer shots, reproducible, open the plot afterwards
//! grid-sweep --shots 1e3 --seed 7 --show-plot
//!
//! # Custom grid from a config file
//! grid-sweep --config grid_sweep.yaml --output-dir out/
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use clap::Parser;
use tracing::{error, info, warn};

use cat_ring_sweep::evaluator::SurfaceCodeEvaluator;
use cat_ring_sweep::logging::init_logging;
use cat_ring_sweep::sweep::{persist_and_plot, SweepParameters, SweepRunner};
use cat_ring_sweep::{config::Config, validation, Result, VERSION};

/// Concentric-ring grid sweep over a biased-noise surface-code memory
#[derive(Parser)]
#[command(name = "grid-sweep")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "Sweep ring count and cat-pump strength, record eps_log")]
struct Cli {
    /// Shots per grid point (integer or integral float such as 1e4)
    #[arg(long, value_parser = parse_shot_count, allow_negative_numbers = true)]
    shots: Option<i64>,

    /// Open the saved plot in the system image viewer
    #[arg(long)]
    show_plot: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Evaluator PRNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory (default: results)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

/// Accept `10000` as well as integral float notation such as `1e4`.
fn parse_shot_count(s: &str) -> std::result::Result<i64, String> {
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return Err(format!("'{}' is not a whole number of shots", s));
    }
    Ok(value as i64)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Grid sweep failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    // CLI flags take precedence over file and environment
    if let Some(shots) = cli.shots {
        config.sweep.shots = shots;
    }
    if let Some(seed) = cli.seed {
        config.evaluator.seed = Some(seed);
    }
    if let Some(dir) = cli.output_dir {
        config.output.directory = dir;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.show_plot {
        config.output.show_plot = true;
    }

    init_logging(&config.logging.level, &config.logging.format)?;
    config.validate()?;
    let shots = validation::validate_shots(config.sweep.shots, config.sweep.max_shots)?;

    let evaluator = SurfaceCodeEvaluator::from_config(&config.evaluator);
    let params = SweepParameters::from(&config.evaluator);

    info!(
        version = VERSION,
        ring_counts = ?config.sweep.ring_counts,
        pump_strengths_khz = ?config.sweep.pump_strengths_khz,
        shots,
        seed = ?config.evaluator.seed,
        "Starting grid-sweep"
    );

    let table = SweepRunner::new(&evaluator, params).run(
        &config.sweep.ring_counts,
        &config.sweep.pump_strengths_khz,
        shots,
    )?;
    let artifacts = persist_and_plot(&table, &config.output.directory)?;

    println!("Saved {}", artifacts.csv_path.display());
    println!("Saved {}", artifacts.plot_path.display());

    if config.output.show_plot {
        open_in_viewer(&artifacts.plot_path);
    }

    Ok(())
}

/// Open `path` with the platform's default viewer. Failure only warns.
fn open_in_viewer(path: &Path) {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };

    match command.arg(path).spawn() {
        Ok(_) => info!(path = %path.display(), "Opened plot viewer"),
        Err(e) => warn!(error = %e, path = %path.display(), "Could not open plot viewer"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shot_count_forms() {
        assert_eq!(parse_shot_count("10000").unwrap(), 10_000);
        assert_eq!(parse_shot_count("1e4").unwrap(), 10_000);
        assert_eq!(parse_shot_count("2.0e3").unwrap(), 2_000);
        assert_eq!(parse_shot_count("-5").unwrap(), -5);
        assert_eq!(parse_shot_count("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_shot_count_rejects_fractions_and_text() {
        assert!(parse_shot_count("1.5").is_err());
        assert!(parse_shot_count("lots").is_err());
        assert!(parse_shot_count("inf").is_err());
        assert!(parse_shot_count("1e30").is_err());
    }

    #[test]
    fn test_cli_parses_negative_shots() {
        let cli = Cli::try_parse_from(["grid-sweep", "--shots", "-5"]).unwrap();
        assert_eq!(cli.shots, Some(-5));
        assert!(!cli.show_plot);
    }

    #[test]
    fn test_cli_all_flags() {
        let cli = Cli::try_parse_from([
            "grid-sweep",
            "--shots",
            "1e3",
            "--show-plot",
            "--seed",
            "7",
            "--output-dir",
            "out",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.shots, Some(1000));
        assert!(cli.show_plot);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
