// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the sweep and the Liouvillian solver.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. grid_sweep.yaml file
//! 3. Environment variables (GRID_SWEEP_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::validation;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Sweep grid and shot count
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Noisy-circuit evaluator settings
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    /// Output locations
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Liouvillian solver defaults
    #[serde(default)]
    pub liouvillian: LiouvillianConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::read_file(config_path)?;

        // Override with environment variables
        config.apply_env_overrides(|key| env::var(key).ok());

        Ok(config)
    }

    /// Read the YAML file layer on top of the defaults.
    fn read_file(config_path: Option<&Path>) -> Result<Self> {
        // Load from file if specified
        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                return Ok(serde_yaml::from_str(&content)?);
            }
            return Ok(Config::default());
        }

        // Try default locations
        for path in &["grid_sweep.yaml", "grid_sweep.yml"] {
            let path = Path::new(path);
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                return Ok(serde_yaml::from_str(&content)?);
            }
        }

        Ok(Config::default())
    }

    /// Apply `GRID_SWEEP_*` overrides read through `lookup`.
    ///
    /// Unparseable numeric values are ignored.
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(shots) = lookup("GRID_SWEEP_SHOTS").and_then(|v| v.parse().ok()) {
            self.sweep.shots = shots;
        }
        if let Some(seed) = lookup("GRID_SWEEP_SEED").and_then(|v| v.parse().ok()) {
            self.evaluator.seed = Some(seed);
        }
        if let Some(val) = lookup("GRID_SWEEP_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(val);
        }
        if let Some(val) = lookup("GRID_SWEEP_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("GRID_SWEEP_LOG_FORMAT") {
            self.logging.format = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate_ring_counts(&self.sweep.ring_counts)?;
        validation::validate_pump_strengths(&self.sweep.pump_strengths_khz)?;
        validation::validate_shots(self.sweep.shots, self.sweep.max_shots)?;

        let distance = self.evaluator.distance;
        if distance < 3 || distance % 2 == 0 {
            return Err(Error::Config(format!(
                "code distance must be odd and >= 3, got {}",
                distance
            )));
        }
        validation::validate_probability(
            "evaluator.physical_error_rate",
            self.evaluator.physical_error_rate,
        )?;
        if !(self.evaluator.bias_reference_hz > 0.0) {
            return Err(Error::Config(
                "evaluator.bias_reference_hz must be positive".into(),
            ));
        }
        if self.output.directory.as_os_str().is_empty() {
            return Err(Error::Config("output.directory cannot be empty".into()));
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(Error::Config(format!(
                    "logging.format must be 'pretty' or 'json', got '{}'",
                    other
                )))
            }
        }
        Ok(())
    }
}

/// Sweep grid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Ring counts (outer loop)
    #[serde(default = "default_ring_counts")]
    pub ring_counts: Vec<u32>,

    /// Cat-pump strengths in kHz (inner loop)
    #[serde(default = "default_pump_strengths")]
    pub pump_strengths_khz: Vec<f64>,

    /// Samples per grid point
    #[serde(default = "default_shots")]
    pub shots: i64,

    /// Upper bound on samples per grid point
    #[serde(default = "default_max_shots")]
    pub max_shots: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            ring_counts: default_ring_counts(),
            pump_strengths_khz: default_pump_strengths(),
            shots: default_shots(),
            max_shots: default_max_shots(),
        }
    }
}

fn default_ring_counts() -> Vec<u32> {
    vec![3, 5, 7]
}

fn default_pump_strengths() -> Vec<f64> {
    vec![50.0, 150.0, 300.0]
}

fn default_shots() -> i64 {
    10_000
}

fn default_max_shots() -> u64 {
    100_000_000
}

/// Noisy-circuit evaluator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Surface-code distance
    #[serde(default = "default_distance")]
    pub distance: u32,

    /// Depolarizing rate after each Clifford gate
    #[serde(default = "default_physical_error_rate")]
    pub physical_error_rate: f64,

    /// Pump strength (Hz) at which the bias factor equals one
    #[serde(default = "default_bias_reference_hz")]
    pub bias_reference_hz: f64,

    /// PRNG seed (fresh entropy when unset)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            distance: default_distance(),
            physical_error_rate: default_physical_error_rate(),
            bias_reference_hz: default_bias_reference_hz(),
            seed: None,
        }
    }
}

fn default_distance() -> u32 {
    3
}

fn default_physical_error_rate() -> f64 {
    1e-3
}

fn default_bias_reference_hz() -> f64 {
    50_000.0
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the CSV and the plot
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Open the plot in the system viewer after saving
    #[serde(default)]
    pub show_plot: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            show_plot: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Liouvillian solver defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiouvillianConfig {
    /// Spectral density amplitude A
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,

    /// Spectral density exponent alpha
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Cutoff frequency wc
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,

    /// Number of eigenvalues to report
    #[serde(default = "default_num_eval")]
    pub num_eval: usize,
}

impl Default for LiouvillianConfig {
    fn default() -> Self {
        Self {
            amplitude: default_amplitude(),
            alpha: default_alpha(),
            cutoff: default_cutoff(),
            num_eval: default_num_eval(),
        }
    }
}

fn default_amplitude() -> f64 {
    1e-4
}

fn default_alpha() -> f64 {
    1.0
}

fn default_cutoff() -> f64 {
    5.0
}

fn default_num_eval() -> usize {
    10
}
