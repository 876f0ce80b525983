// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities: stub evaluators.

use std::cell::{Cell, RefCell};

use crate::error::EvaluatorError;
use crate::evaluator::{CircuitEvaluator, EvaluationRequest};

/// Evaluator that returns the same rate for every request.
pub struct ConstantEvaluator {
    rate: f64,
}

impl ConstantEvaluator {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl CircuitEvaluator for ConstantEvaluator {
    fn name(&self) -> &str {
        "constant"
    }

    fn evaluate(&self, _request: &EvaluationRequest) -> Result<f64, EvaluatorError> {
        Ok(self.rate)
    }
}

/// Evaluator whose rate is `scale * measurement_flip_probability`, capped
/// at one.
pub struct FlipProportionalEvaluator {
    scale: f64,
}

impl FlipProportionalEvaluator {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl CircuitEvaluator for FlipProportionalEvaluator {
    fn name(&self) -> &str {
        "flip_proportional"
    }

    fn evaluate(&self, request: &EvaluationRequest) -> Result<f64, EvaluatorError> {
        Ok((self.scale * request.measurement_flip_probability).min(1.0))
    }
}

/// Evaluator that succeeds `ok_calls` times and then fails.
pub struct FailingEvaluator {
    ok_calls: usize,
    calls: Cell<usize>,
}

impl FailingEvaluator {
    pub fn after(ok_calls: usize) -> Self {
        Self {
            ok_calls,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CircuitEvaluator for FailingEvaluator {
    fn name(&self) -> &str {
        "failing"
    }

    fn evaluate(&self, _request: &EvaluationRequest) -> Result<f64, EvaluatorError> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if n >= self.ok_calls {
            Err(EvaluatorError::Sampling("simulated sampler crash".into()))
        } else {
            Ok(0.0)
        }
    }
}

/// Evaluator that records every request it receives.
#[derive(Default)]
pub struct RecordingEvaluator {
    requests: RefCell<Vec<EvaluationRequest>>,
}

impl RecordingEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<EvaluationRequest> {
        self.requests.borrow().clone()
    }
}

impl CircuitEvaluator for RecordingEvaluator {
    fn name(&self) -> &str {
        "recording"
    }

    fn evaluate(&self, request: &EvaluationRequest) -> Result<f64, EvaluatorError> {
        self.requests.borrow_mut().push(*request);
        Ok(0.0)
    }
}
