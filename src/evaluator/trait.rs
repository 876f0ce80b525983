// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Noisy-circuit evaluator trait definition.

use crate::error::EvaluatorError;

/// Parameters of one memory-experiment evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationRequest {
    /// Code distance (odd, at least 3)
    pub distance: u32,
    /// Number of syndrome-extraction rounds
    pub rounds: u32,
    /// Depolarizing probability after each Clifford gate
    pub physical_error_rate: f64,
    /// Flip probability applied before each measurement
    pub measurement_flip_probability: f64,
    /// Number of Monte-Carlo shots
    pub shots: u64,
}

impl EvaluationRequest {
    /// Check that the request describes a well-formed memory experiment.
    pub fn validate(&self) -> Result<(), EvaluatorError> {
        if self.distance < 3 || self.distance % 2 == 0 {
            return Err(EvaluatorError::InvalidCircuit(format!(
                "distance must be odd and at least 3, got {}",
                self.distance
            )));
        }
        if self.rounds == 0 {
            return Err(EvaluatorError::InvalidCircuit(
                "rounds must be at least 1".into(),
            ));
        }
        for (name, p) in [
            ("physical_error_rate", self.physical_error_rate),
            (
                "measurement_flip_probability",
                self.measurement_flip_probability,
            ),
        ] {
            if p.is_nan() || !(0.0..=0.5).contains(&p) {
                return Err(EvaluatorError::InvalidCircuit(format!(
                    "{} must lie in [0, 0.5], got {}",
                    name, p
                )));
            }
        }
        if self.shots == 0 {
            return Err(EvaluatorError::InvalidCircuit(
                "shots must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// The trait every noisy-circuit evaluator implements.
///
/// An evaluator returns the fraction of shots in which the decoded
/// correction disagrees with the true logical observable.
pub trait CircuitEvaluator {
    /// Get the evaluator name.
    fn name(&self) -> &str;

    /// Estimate the logical error rate for one request.
    fn evaluate(&self, request: &EvaluationRequest) -> Result<f64, EvaluatorError>;
}
