// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Grid sweep over ring counts and pump strengths.

use tracing::{debug, info};

use super::types::{ResultRow, ResultTable, SweepPoint};
use crate::config::EvaluatorConfig;
use crate::error::{Result, ValidationError};
use crate::evaluator::{CircuitEvaluator, EvaluationRequest};
use crate::validation::{validate_probability, validate_pump_strengths, validate_ring_counts};

/// Fixed circuit parameters shared by every grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepParameters {
    /// Code distance
    pub distance: u32,
    /// Depolarizing probability after each Clifford gate
    pub physical_error_rate: f64,
    /// Pump rate (Hz) at which the bias equals one
    pub bias_reference_hz: f64,
}

impl Default for SweepParameters {
    fn default() -> Self {
        Self {
            distance: 3,
            physical_error_rate: 1e-3,
            bias_reference_hz: 50_000.0,
        }
    }
}

impl From<&EvaluatorConfig> for SweepParameters {
    fn from(config: &EvaluatorConfig) -> Self {
        Self {
            distance: config.distance,
            physical_error_rate: config.physical_error_rate,
            bias_reference_hz: config.bias_reference_hz,
        }
    }
}

/// Runs an evaluator over the cross product of a sweep grid.
pub struct SweepRunner<'a> {
    evaluator: &'a dyn CircuitEvaluator,
    params: SweepParameters,
}

impl<'a> SweepRunner<'a> {
    pub fn new(evaluator: &'a dyn CircuitEvaluator, params: SweepParameters) -> Self {
        Self { evaluator, params }
    }

    /// Evaluate every (ring count, pump strength) pair, ring counts outer.
    ///
    /// All inputs are validated before the first evaluation. The first
    /// evaluator failure aborts the sweep.
    pub fn run(
        &self,
        ring_counts: &[u32],
        pump_strengths_khz: &[f64],
        shots: u64,
    ) -> Result<ResultTable> {
        if shots == 0 {
            return Err(ValidationError::Field {
                field: "shots".into(),
                message: "must be greater than 0".into(),
            }
            .into());
        }
        validate_ring_counts(ring_counts)?;
        validate_pump_strengths(pump_strengths_khz)?;
        validate_probability("physical_error_rate", self.params.physical_error_rate)?;

        info!(
            evaluator = self.evaluator.name(),
            points = ring_counts.len() * pump_strengths_khz.len(),
            shots,
            "Starting grid sweep"
        );

        let mut table = ResultTable::new();
        for &ring_count in ring_counts {
            for &pump_strength_khz in pump_strengths_khz {
                let point = SweepPoint::new(ring_count, pump_strength_khz);
                let flip = point.measurement_flip_probability(
                    self.params.physical_error_rate,
                    self.params.bias_reference_hz,
                );
                debug!(
                    ring_count,
                    pump_strength_khz,
                    bias = point.bias(self.params.bias_reference_hz),
                    flip,
                    "Evaluating grid point"
                );

                let request = EvaluationRequest {
                    distance: self.params.distance,
                    rounds: ring_count,
                    physical_error_rate: self.params.physical_error_rate,
                    measurement_flip_probability: flip,
                    shots,
                };
                let rate = self.evaluator.evaluate(&request)?;

                info!(
                    ring_count,
                    pump_strength_khz,
                    eps_log = rate,
                    "Grid point done"
                );
                table.push(ResultRow {
                    ring_count,
                    pump_strength_khz,
                    logical_error_rate: rate,
                })?;
            }
        }

        Ok(table)
    }
}

/// Run a sweep with the default circuit parameters.
pub fn run_sweep(
    evaluator: &dyn CircuitEvaluator,
    ring_counts: &[u32],
    pump_strengths_khz: &[f64],
    shots: u64,
) -> Result<ResultTable> {
    SweepRunner::new(evaluator, SweepParameters::default()).run(
        ring_counts,
        pump_strengths_khz,
        shots,
    )
}
