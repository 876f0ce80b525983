// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Noisy-circuit evaluators.
//!
//! This module provides the [`CircuitEvaluator`] trait and its one concrete
//! implementation:
//!
//! - `surface::SurfaceCodeEvaluator`: rotated surface-code memory experiment
//!   sampled from a detector error model and decoded by minimum-weight matching

pub mod surface;
pub mod r#trait;

pub use r#trait::{CircuitEvaluator, EvaluationRequest};
pub use surface::SurfaceCodeEvaluator;
