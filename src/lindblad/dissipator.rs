// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lindblad generator acting on a density matrix.
//!
//! Ref: Breuer & Petruccione, "The Theory of Open Quantum Systems" (2002), Ch. 3.

use ndarray::Array2;
use num_complex::Complex64;

use super::types::CollapseOperator;

/// Dissipator of a single collapse operator.
///
/// D[L](ρ) = γ (L ρ L† − ½ {L†L, ρ})
pub fn dissipator(op: &CollapseOperator, rho: &Array2<Complex64>) -> Array2<Complex64> {
    if op.rate == 0.0 {
        return Array2::zeros(rho.raw_dim());
    }

    let jump = &op.matrix;
    let jump_dag = conjugate_transpose(jump);
    let number = jump_dag.dot(jump);

    let sandwich = jump.dot(rho).dot(&jump_dag);
    let decay = anticommutator(&number, rho).mapv(|z| z * 0.5);
    (sandwich - decay).mapv(|z| z * op.rate)
}

/// Sum of the dissipators of every collapse operator matching ρ's dimension.
pub fn total_dissipator(
    collapse_ops: &[CollapseOperator],
    rho: &Array2<Complex64>,
) -> Array2<Complex64> {
    let d = rho.nrows();
    collapse_ops
        .iter()
        .filter(|op| op.matrix.nrows() == d)
        .fold(Array2::zeros((d, d)), |acc, op| acc + dissipator(op, rho))
}

/// GKSL generator: L(ρ) = -i[H, ρ] + Σ_k D[L_k](ρ).
pub fn lindblad_rhs(
    hamiltonian: &Array2<Complex64>,
    collapse_ops: &[CollapseOperator],
    rho: &Array2<Complex64>,
) -> Array2<Complex64> {
    let minus_i = Complex64::new(0.0, -1.0);
    commutator(hamiltonian, rho).mapv(|z| z * minus_i) + total_dissipator(collapse_ops, rho)
}

fn commutator(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    a.dot(b) - b.dot(a)
}

fn anticommutator(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    a.dot(b) + b.dot(a)
}

/// Conjugate transpose (dagger).
pub fn conjugate_transpose(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lindblad::types::QubitOperator;
    use approx::assert_relative_eq;

    fn excited_state() -> Array2<Complex64> {
        // σ⁻ maps basis state 0 to 1, so state 0 is the excited one
        let mut m = Array2::zeros((2, 2));
        m[[0, 0]] = Complex64::new(1.0, 0.0);
        m
    }

    fn ground_state() -> Array2<Complex64> {
        let mut m = Array2::zeros((2, 2));
        m[[1, 1]] = Complex64::new(1.0, 0.0);
        m
    }

    fn plus_state() -> Array2<Complex64> {
        Array2::from_elem((2, 2), Complex64::new(0.5, 0.0))
    }

    #[test]
    fn test_ground_state_is_fixed_point_of_relaxation() {
        let d = dissipator(&CollapseOperator::lowering(3.0), &ground_state());
        for elem in d.iter() {
            assert_relative_eq!(elem.norm(), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_excited_state_decays() {
        let gamma = 0.7;
        let d = dissipator(&CollapseOperator::lowering(gamma), &excited_state());
        assert_relative_eq!(d[[0, 0]].re, -gamma, epsilon = 1e-12);
        assert_relative_eq!(d[[1, 1]].re, gamma, epsilon = 1e-12);
    }

    #[test]
    fn test_dissipator_preserves_trace() {
        for op in [CollapseOperator::lowering(2.0), CollapseOperator::dephasing(0.3)] {
            let d = dissipator(&op, &plus_state());
            let trace = d[[0, 0]] + d[[1, 1]];
            assert_relative_eq!(trace.norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_dephasing_kills_coherences() {
        // D[σz](ρ)_01 = -2γ ρ_01, populations untouched
        let gamma = 0.25;
        let d = dissipator(&CollapseOperator::dephasing(gamma), &plus_state());
        assert_relative_eq!(d[[0, 0]].norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(d[[1, 1]].norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(d[[0, 1]].re, -2.0 * gamma * 0.5, epsilon = 1e-12);
        assert_relative_eq!(d[[1, 0]].re, -2.0 * gamma * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_rate_gives_zero_dissipator() {
        let d = dissipator(&CollapseOperator::lowering(0.0), &excited_state());
        assert!(d.iter().all(|z| z.norm() == 0.0));
    }

    #[test]
    fn test_mismatched_dimensions_skipped() {
        let rho = Array2::from_elem((3, 3), Complex64::new(1.0 / 3.0, 0.0));
        let total = total_dissipator(&[CollapseOperator::lowering(1.0)], &rho);
        assert!(total.iter().all(|z| z.norm() == 0.0));
    }

    #[test]
    fn test_lindblad_rhs_unitary_only() {
        // [σz, ρ] vanishes for diagonal ρ
        let h = QubitOperator::SigmaZ.matrix();
        let drho = lindblad_rhs(&h, &[], &excited_state());
        for elem in drho.iter() {
            assert_relative_eq!(elem.norm(), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_lindblad_rhs_commutator() {
        // -i[σz/2, |+><+|] rotates the coherence
        let h = QubitOperator::SigmaZ.matrix().mapv(|z| z * 0.5);
        let drho = lindblad_rhs(&h, &[], &plus_state());
        assert_relative_eq!(drho[[0, 1]].im, -0.5, epsilon = 1e-12);
        assert_relative_eq!(drho[[1, 0]].im, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_commutators() {
        let x = QubitOperator::SigmaX.matrix();
        let z = QubitOperator::SigmaZ.matrix();
        // {σx, σz} = 0 and [σx, σx] = 0
        assert!(anticommutator(&x, &z).iter().all(|c| c.norm() < 1e-15));
        assert!(commutator(&x, &x).iter().all(|c| c.norm() < 1e-15));
    }

    #[test]
    fn test_conjugate_transpose() {
        let mut m = Array2::zeros((2, 2));
        m[[0, 1]] = Complex64::new(1.0, 2.0);
        m[[1, 0]] = Complex64::new(3.0, 4.0);
        let dag = conjugate_transpose(&m);
        assert_eq!(dag[[0, 1]], Complex64::new(3.0, -4.0));
        assert_eq!(dag[[1, 0]], Complex64::new(1.0, -2.0));
    }
}
