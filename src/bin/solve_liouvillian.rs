// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Low-lying Liouvillian spectrum of a qubit in a colored-noise bath.
//!
//! ```bash
//! solve-liouvillian --ham "0.5*sigmaz()" --A 1e-4 --alpha 1.0 --wc 5.0 --num_eval 10
//! ```
//!
//! Prints one tab-separated row per eigenvalue, ordered by |λ|.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{error, info};

use cat_ring_sweep::error::ValidationError;
use cat_ring_sweep::lindblad::{
    colored_noise_liouvillian, liouvillian_spectrum, parse_hamiltonian, EigenMode,
    SpectralDensity,
};
use cat_ring_sweep::logging::init_logging;
use cat_ring_sweep::{config::Config, Result, VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Tab-separated table
    Table,
    /// JSON document
    Json,
}

/// Diagonalize the colored-noise Liouvillian of a single-qubit Hamiltonian
#[derive(Parser)]
#[command(name = "solve-liouvillian")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "Low-lying eigenvalues of a colored-noise Liouvillian")]
struct Cli {
    /// Hamiltonian expression, e.g. "0.5*sigmaz()"
    #[arg(long)]
    ham: String,

    /// Spectral density amplitude
    #[arg(long = "A")]
    amplitude: Option<f64>,

    /// Spectral density exponent
    #[arg(long)]
    alpha: Option<f64>,

    /// Spectral density cutoff frequency
    #[arg(long = "wc")]
    cutoff: Option<f64>,

    /// Number of eigenvalues to report
    #[arg(long = "num_eval")]
    num_eval: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Serialize)]
struct SpectrumReport<'a> {
    hamiltonian: &'a str,
    amplitude: f64,
    alpha: f64,
    cutoff: f64,
    modes: &'a [EigenMode],
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Liouvillian solve failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    let settings = &mut config.liouvillian;
    if let Some(a) = cli.amplitude {
        settings.amplitude = a;
    }
    if let Some(alpha) = cli.alpha {
        settings.alpha = alpha;
    }
    if let Some(wc) = cli.cutoff {
        settings.cutoff = wc;
    }
    if let Some(k) = cli.num_eval {
        settings.num_eval = k;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging.level, &config.logging.format)?;

    let settings = &config.liouvillian;
    if settings.num_eval == 0 {
        return Err(ValidationError::Field {
            field: "num_eval".into(),
            message: "must be at least 1".into(),
        }
        .into());
    }
    let density = SpectralDensity::new(settings.amplitude, settings.alpha, settings.cutoff);

    info!(
        version = VERSION,
        ham = %cli.ham,
        amplitude = density.amplitude,
        alpha = density.alpha,
        cutoff = density.cutoff,
        num_eval = settings.num_eval,
        "Solving Liouvillian"
    );

    let hamiltonian = parse_hamiltonian(&cli.ham)?;
    let liouvillian = colored_noise_liouvillian(&hamiltonian, &density)?;
    let modes = liouvillian_spectrum(&liouvillian, settings.num_eval)?;

    match cli.format {
        OutputFormat::Table => {
            println!("index\tre(λ)\tim(λ)\tpurity");
            for mode in &modes {
                println!(
                    "{}\t{:.6e}\t{:.6e}\t{:.6}",
                    mode.index, mode.re, mode.im, mode.purity
                );
            }
        }
        OutputFormat::Json => {
            let report = SpectrumReport {
                hamiltonian: &cli.ham,
                amplitude: density.amplitude,
                alpha: density.alpha,
                cutoff: density.cutoff,
                modes: &modes,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
