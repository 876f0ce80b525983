// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for sweep requests.

use crate::error::{Result, ValidationError};

/// Validate a requested shot count and convert it to the unsigned form the
/// evaluator consumes.
pub fn validate_shots(shots: i64, max_shots: u64) -> Result<u64> {
    if shots <= 0 {
        return Err(ValidationError::Field {
            field: "shots".into(),
            message: format!("must be greater than 0, got {}", shots),
        }
        .into());
    }

    let shots = shots as u64;
    if shots > max_shots {
        return Err(ValidationError::ResourceLimit {
            resource: "shots".into(),
            limit: max_shots,
            requested: shots,
        }
        .into());
    }

    Ok(shots)
}

/// Validate the ring-count axis of the sweep grid.
pub fn validate_ring_counts(ring_counts: &[u32]) -> Result<()> {
    if ring_counts.is_empty() {
        return Err(ValidationError::Field {
            field: "ring_counts".into(),
            message: "cannot be empty".into(),
        }
        .into());
    }

    for (i, &n) in ring_counts.iter().enumerate() {
        if n == 0 {
            return Err(ValidationError::Field {
                field: "ring_counts".into(),
                message: format!("must be positive, got 0 at index {}", i),
            }
            .into());
        }
        if ring_counts[..i].contains(&n) {
            return Err(ValidationError::Field {
                field: "ring_counts".into(),
                message: format!("duplicate value {} at index {}", n, i),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate the cat-pump-strength axis of the sweep grid (kHz).
pub fn validate_pump_strengths(pump_strengths_khz: &[f64]) -> Result<()> {
    if pump_strengths_khz.is_empty() {
        return Err(ValidationError::Field {
            field: "pump_strengths_khz".into(),
            message: "cannot be empty".into(),
        }
        .into());
    }

    for (i, &k) in pump_strengths_khz.iter().enumerate() {
        if k.is_nan() || k.is_infinite() {
            return Err(ValidationError::Field {
                field: "pump_strengths_khz".into(),
                message: format!("contains non-finite value at index {}", i),
            }
            .into());
        }
        if k <= 0.0 {
            return Err(ValidationError::Field {
                field: "pump_strengths_khz".into(),
                message: format!("must be positive, got {} at index {}", k, i),
            }
            .into());
        }
        if pump_strengths_khz[..i].contains(&k) {
            return Err(ValidationError::Field {
                field: "pump_strengths_khz".into(),
                message: format!("duplicate value {} at index {}", k, i),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate an error probability. Anything above one half would give a
/// matching graph with negative edge weights.
pub fn validate_probability(field: &str, p: f64) -> Result<()> {
    if p.is_nan() || !(0.0..=0.5).contains(&p) {
        return Err(ValidationError::PhysicsConstraint(format!(
            "{} must lie in [0, 0.5], got {}",
            field, p
        ))
        .into());
    }
    Ok(())
}
