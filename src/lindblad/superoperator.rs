// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Liouvillian superoperator for a qubit in a colored-noise bath.
//!
//! The superoperator acts on column-stacked density matrices:
//! `vec(ρ)[i + j d] = ρ[i, j]`. Column `k` of L is `vec(L(E_k))` where `E_k`
//! is the basis matrix with a single one at `(k mod d, k / d)`.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use tracing::debug;

use super::dissipator::lindblad_rhs;
use super::eigen::hermitian_eigenvalues;
use super::types::{CollapseOperator, SpectralDensity};
use crate::error::{Error, Result};

/// Collapse operators induced by the bath at the Hamiltonian's transition
/// frequency: relaxation at S(ω₀) and dephasing at S(0).
pub fn colored_noise_collapse_ops(
    hamiltonian: &Array2<Complex64>,
    density: &SpectralDensity,
) -> Result<Vec<CollapseOperator>> {
    let energies = hermitian_eigenvalues(hamiltonian)?;
    let omega0 = match (energies.first(), energies.last()) {
        (Some(low), Some(high)) => high - low,
        _ => 0.0,
    };
    let gamma = density.evaluate(omega0);
    let gamma_phi = density.evaluate(0.0);
    debug!(omega0, gamma, gamma_phi, "Bath rates");

    Ok(vec![
        CollapseOperator::lowering(gamma),
        CollapseOperator::dephasing(gamma_phi),
    ])
}

/// Assemble the d² × d² Liouvillian of `hamiltonian` with `collapse_ops`.
pub fn build_liouvillian(
    hamiltonian: &Array2<Complex64>,
    collapse_ops: &[CollapseOperator],
) -> Result<Array2<Complex64>> {
    let d = hamiltonian.nrows();
    if d == 0 || hamiltonian.ncols() != d {
        return Err(Error::Solver(format!(
            "Hamiltonian must be square and non-empty, got {} × {}",
            hamiltonian.nrows(),
            hamiltonian.ncols()
        )));
    }
    for op in collapse_ops {
        op.validate()?;
        if op.matrix.nrows() != d {
            return Err(Error::Solver(format!(
                "collapse operator '{}' has dimension {}, Hamiltonian has {}",
                op.label,
                op.matrix.nrows(),
                d
            )));
        }
    }

    let n = d * d;
    let mut liouvillian = Array2::zeros((n, n));
    for k in 0..n {
        let mut basis = Array2::zeros((d, d));
        basis[[k % d, k / d]] = Complex64::new(1.0, 0.0);
        let image = lindblad_rhs(hamiltonian, collapse_ops, &basis);
        liouvillian
            .column_mut(k)
            .assign(&operator_to_vector(&image));
    }

    Ok(liouvillian)
}

/// Build the colored-noise Liouvillian for a single-qubit Hamiltonian.
pub fn colored_noise_liouvillian(
    hamiltonian: &Array2<Complex64>,
    density: &SpectralDensity,
) -> Result<Array2<Complex64>> {
    density.validate()?;
    let ops = colored_noise_collapse_ops(hamiltonian, density)?;
    build_liouvillian(hamiltonian, &ops)
}

/// Column-stack an operator.
pub fn operator_to_vector(op: &Array2<Complex64>) -> Array1<Complex64> {
    op.t().iter().copied().collect()
}

/// Inverse of [`operator_to_vector`]. The length must be a perfect square.
pub fn vector_to_operator(vec: &Array1<Complex64>) -> Result<Array2<Complex64>> {
    let d = (vec.len() as f64).sqrt().round() as usize;
    if d * d != vec.len() {
        return Err(Error::Solver(format!(
            "vector of length {} is not a vectorized square operator",
            vec.len()
        )));
    }
    Ok(Array2::from_shape_fn((d, d), |(i, j)| vec[i + j * d]))
}

/// Tr(ρ†ρ) of an operator.
pub fn operator_purity(op: &Array2<Complex64>) -> f64 {
    op.iter().map(|z| z.norm_sqr()).sum()
}
