// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lindblad master equation types.
//!
//! Ref: Lindblad (1976), Commun. Math. Phys. 48, 119.
//! Ref: Gorini, Kossakowski, Sudarshan (1976), J. Math. Phys. 17, 821.

use ndarray::Array2;
use num_complex::Complex64;
use serde::Serialize;

use crate::error::{Result, ValidationError};

/// Single-qubit operators. The basis is ordered so that `sigmaz` is
/// `diag(1, -1)` and `sigmam` maps the first basis state to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QubitOperator {
    SigmaX,
    SigmaY,
    SigmaZ,
    SigmaPlus,
    SigmaMinus,
    Identity,
}

impl QubitOperator {
    /// Dense 2 × 2 matrix of the operator.
    pub fn matrix(self) -> Array2<Complex64> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let entries = match self {
            QubitOperator::SigmaX => [zero, one, one, zero],
            QubitOperator::SigmaY => [zero, -i, i, zero],
            QubitOperator::SigmaZ => [one, zero, zero, -one],
            QubitOperator::SigmaPlus => [zero, one, zero, zero],
            QubitOperator::SigmaMinus => [zero, zero, one, zero],
            QubitOperator::Identity => [one, zero, zero, one],
        };
        let mut m = Array2::zeros((2, 2));
        m[[0, 0]] = entries[0];
        m[[0, 1]] = entries[1];
        m[[1, 0]] = entries[2];
        m[[1, 1]] = entries[3];
        m
    }
}

/// A Lindblad collapse (jump) operator with its rate.
///
/// Represents a single dissipation channel:
///   D[L](ρ) = γ (L ρ L† − ½{L†L, ρ})
#[derive(Debug, Clone)]
pub struct CollapseOperator {
    /// Operator matrix (d × d).
    pub matrix: Array2<Complex64>,
    /// Rate γ, in the same units as the Hamiltonian.
    pub rate: f64,
    /// Human-readable label.
    pub label: String,
}

impl CollapseOperator {
    /// Energy relaxation: L = σ⁻ at rate γ.
    pub fn lowering(rate: f64) -> Self {
        Self {
            matrix: QubitOperator::SigmaMinus.matrix(),
            rate,
            label: "relaxation".into(),
        }
    }

    /// Pure dephasing: L = σz at rate γφ.
    pub fn dephasing(rate: f64) -> Self {
        Self {
            matrix: QubitOperator::SigmaZ.matrix(),
            rate,
            label: "dephasing".into(),
        }
    }

    /// Check the operator is square with a finite non-negative rate.
    pub fn validate(&self) -> Result<()> {
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(ValidationError::PhysicsConstraint(format!(
                "collapse operator '{}' has invalid rate {:.2e}",
                self.label, self.rate
            ))
            .into());
        }
        if self.matrix.nrows() != self.matrix.ncols() {
            return Err(ValidationError::Field {
                field: self.label.clone(),
                message: format!(
                    "matrix must be square ({} × {})",
                    self.matrix.nrows(),
                    self.matrix.ncols()
                ),
            }
            .into());
        }
        Ok(())
    }
}

/// Colored-noise spectral density S(ω) = A / (|ω|^α + ω_c^α).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralDensity {
    /// Amplitude A
    pub amplitude: f64,
    /// Exponent α
    pub alpha: f64,
    /// Cutoff frequency ω_c
    pub cutoff: f64,
}

impl SpectralDensity {
    pub fn new(amplitude: f64, alpha: f64, cutoff: f64) -> Self {
        Self {
            amplitude,
            alpha,
            cutoff,
        }
    }

    pub fn evaluate(&self, omega: f64) -> f64 {
        self.amplitude / (omega.abs().powf(self.alpha) + self.cutoff.powf(self.alpha))
    }

    /// Require A > 0, ω_c > 0 and a finite α.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("A", self.amplitude, self.amplitude > 0.0),
            ("alpha", self.alpha, self.alpha.is_finite()),
            ("wc", self.cutoff, self.cutoff > 0.0),
        ];
        for (field, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(ValidationError::Field {
                    field: field.into(),
                    message: format!("invalid spectral density parameter {}", value),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// One eigenmode of the Liouvillian.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EigenMode {
    /// Position in the |λ|-sorted spectrum
    pub index: usize,
    /// Real part of λ (decay rate, ≤ 0 for a physical generator)
    pub re: f64,
    /// Imaginary part of λ (oscillation frequency)
    pub im: f64,
    /// Tr(ρ†ρ) of the eigenvector reshaped to an operator
    pub purity: f64,
}

impl EigenMode {
    pub fn eigenvalue(&self) -> Complex64 {
        Complex64::new(self.re, self.im)
    }
}
