// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense eigen-decomposition of small Liouvillians.
//!
//! The non-Hermitian spectrum comes from nalgebra's complex Schur form
//! A = Q T Q†. The eigenvector for the k-th diagonal entry of T is found by
//! back-substitution on the triangular factor and mapped back through Q, so
//! repeated eigenvalues of a diagonalizable matrix get distinct vectors.
//!
//! Ref: Golub & Van Loan, "Matrix Computations" (4th ed.), §7.5–7.6.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::superoperator::{operator_purity, vector_to_operator};
use super::types::EigenMode;
use crate::error::{Error, Result};

/// Total QR iterations allowed for the Schur decomposition.
const MAX_SCHUR_ITERATIONS: usize = 10_000;

/// Relative size of a subdiagonal entry of T treated as zero.
const TRIANGULAR_TOLERANCE: f64 = 1e-10;

fn check_square_finite(a: &Array2<Complex64>) -> Result<()> {
    if a.nrows() != a.ncols() {
        return Err(Error::Solver(format!(
            "eigen-solve needs a square matrix, got {} × {}",
            a.nrows(),
            a.ncols()
        )));
    }
    if a.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(Error::Solver("matrix has non-finite entries".into()));
    }
    Ok(())
}

fn to_nalgebra(a: &Array2<Complex64>) -> DMatrix<Complex64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

fn max_abs(m: &DMatrix<Complex64>) -> f64 {
    m.iter().map(|z| z.norm()).fold(0.0, f64::max)
}

/// Complex Schur factors (Q, T) of a non-empty square matrix.
fn schur_factors(a: &Array2<Complex64>) -> Result<(DMatrix<Complex64>, DMatrix<Complex64>)> {
    let (q, t) = to_nalgebra(a)
        .try_schur(f64::EPSILON, MAX_SCHUR_ITERATIONS)
        .ok_or_else(|| {
            Error::Solver(format!(
                "Schur decomposition did not converge within {} iterations",
                MAX_SCHUR_ITERATIONS
            ))
        })?
        .unpack();

    let scale = max_abs(&t).max(1.0);
    for i in 1..t.nrows() {
        let sub = t[(i, i - 1)].norm();
        if sub > TRIANGULAR_TOLERANCE * scale {
            return Err(Error::Solver(format!(
                "Schur factor is not triangular (|T[{}, {}]| = {:.2e})",
                i,
                i - 1,
                sub
            )));
        }
    }
    Ok((q, t))
}

/// Eigenvector of the triangular factor for its k-th diagonal entry.
fn triangular_eigenvector(t: &DMatrix<Complex64>, k: usize) -> DVector<Complex64> {
    let n = t.nrows();
    let lambda = t[(k, k)];
    let floor = f64::EPSILON * max_abs(t).max(1.0);

    let mut y = DVector::zeros(n);
    y[k] = Complex64::new(1.0, 0.0);
    for j in (0..k).rev() {
        let rhs: Complex64 = ((j + 1)..=k).map(|m| t[(j, m)] * y[m]).sum();
        let mut pivot = t[(j, j)] - lambda;
        if pivot.norm() < floor {
            pivot = Complex64::new(floor, 0.0);
        }
        y[j] = -rhs / pivot;
    }
    y
}

/// All eigenvalues of a square complex matrix, in Schur order.
pub fn eigenvalues(a: &Array2<Complex64>) -> Result<Vec<Complex64>> {
    check_square_finite(a)?;
    if a.nrows() == 0 {
        return Ok(Vec::new());
    }
    let (_, t) = schur_factors(a)?;
    Ok(t.diagonal().iter().copied().collect())
}

/// Eigenvalues of a Hermitian matrix, ascending.
pub fn hermitian_eigenvalues(h: &Array2<Complex64>) -> Result<Vec<f64>> {
    check_square_finite(h)?;
    if h.nrows() == 0 {
        return Ok(Vec::new());
    }
    let mut values: Vec<f64> = to_nalgebra(h).symmetric_eigenvalues().iter().copied().collect();
    values.sort_by(f64::total_cmp);
    Ok(values)
}

/// The `k` smallest-magnitude eigenpairs of `a`, sorted by |λ| ascending.
/// `k` is capped at the matrix dimension; ties keep Schur order.
pub fn smallest_eigenpairs(
    a: &Array2<Complex64>,
    k: usize,
) -> Result<Vec<(Complex64, Array1<Complex64>)>> {
    check_square_finite(a)?;
    if a.nrows() == 0 {
        return Ok(Vec::new());
    }
    let (q, t) = schur_factors(a)?;

    let mut order: Vec<usize> = (0..t.nrows()).collect();
    order.sort_by(|&x, &y| t[(x, x)].norm().total_cmp(&t[(y, y)].norm()));
    order.truncate(k.min(t.nrows()));

    Ok(order
        .into_iter()
        .map(|i| {
            let mut v = &q * triangular_eigenvector(&t, i);
            let norm = v.norm();
            if norm > 0.0 {
                v.unscale_mut(norm);
            }
            (t[(i, i)], v.iter().copied().collect())
        })
        .collect())
}

/// Low-lying spectrum of a Liouvillian with the purity of each mode.
pub fn liouvillian_spectrum(liouvillian: &Array2<Complex64>, k: usize) -> Result<Vec<EigenMode>> {
    smallest_eigenpairs(liouvillian, k)?
        .into_iter()
        .enumerate()
        .map(|(index, (lambda, vec))| {
            let op = vector_to_operator(&vec)?;
            Ok(EigenMode {
                index,
                re: lambda.re,
                im: lambda.im,
                purity: operator_purity(&op),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lindblad::superoperator::{build_liouvillian, colored_noise_liouvillian};
    use crate::lindblad::types::{CollapseOperator, QubitOperator, SpectralDensity};
    use approx::assert_relative_eq;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn residual(a: &Array2<Complex64>, lambda: Complex64, v: &Array1<Complex64>) -> f64 {
        let av = a.dot(v);
        av.iter()
            .zip(v.iter())
            .map(|(x, y)| (x - lambda * y).norm_sqr())
            .sum::<f64>()
            .sqrt()
    }

    fn sorted_by_re_im(mut values: Vec<Complex64>) -> Vec<Complex64> {
        values.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
        values
    }

    #[test]
    fn test_diagonal_matrix() {
        let mut a = Array2::zeros((3, 3));
        a[[0, 0]] = c(3.0);
        a[[1, 1]] = c(-1.0);
        a[[2, 2]] = Complex64::new(0.0, 2.0);
        let values = sorted_by_re_im(eigenvalues(&a).unwrap());
        assert_relative_eq!(values[0].re, -1.0, epsilon = 1e-12);
        assert_relative_eq!(values[1].im, 2.0, epsilon = 1e-12);
        assert_relative_eq!(values[2].re, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_generator_has_imaginary_pair() {
        // [[0, -1], [1, 0]] has eigenvalues ±i
        let mut a = Array2::zeros((2, 2));
        a[[0, 1]] = c(-1.0);
        a[[1, 0]] = c(1.0);
        let values = sorted_by_re_im(eigenvalues(&a).unwrap());
        assert_relative_eq!(values[0].re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(values[0].im, -1.0, epsilon = 1e-12);
        assert_relative_eq!(values[1].im, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_companion_matrix_eigenpairs() {
        // Companion matrix of (x-1)(x-2)(x-3)(x-4)(x-5)
        let coeffs = [15.0, -85.0, 225.0, -274.0, 120.0];
        let mut a = Array2::zeros((5, 5));
        for (j, &v) in coeffs.iter().enumerate() {
            a[[0, j]] = c(v);
        }
        for i in 1..5 {
            a[[i, i - 1]] = c(1.0);
        }

        let pairs = smallest_eigenpairs(&a, 5).unwrap();
        assert_eq!(pairs.len(), 5);
        for (expected, (lambda, v)) in (1..=5).zip(pairs.iter()) {
            assert_relative_eq!(lambda.re, expected as f64, epsilon = 1e-7);
            assert_relative_eq!(lambda.im, 0.0, epsilon = 1e-7);
            assert!(residual(&a, *lambda, v) < 1e-6);
        }
    }

    #[test]
    fn test_schur_factors_reconstruct_matrix() {
        let a = Array2::from_shape_fn((4, 4), |(i, j)| {
            Complex64::new(1.0 + i as f64 * 0.5, j as f64 * 0.25 - (i * j) as f64 * 0.1)
        });
        let (q, t) = schur_factors(&a).unwrap();
        let back = &q * &t * q.adjoint();
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!((back[(i, j)] - a[[i, j]]).norm(), 0.0, epsilon = 1e-10);
            }
        }

        let trace_a: Complex64 = (0..4).map(|i| a[[i, i]]).sum();
        let sum: Complex64 = eigenvalues(&a).unwrap().into_iter().sum();
        assert_relative_eq!((trace_a - sum).norm(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_repeated_eigenvalue_gets_distinct_vectors() {
        let mut a = Array2::zeros((3, 3));
        a[[0, 0]] = c(-1.0);
        a[[1, 1]] = c(-1.0);
        a[[2, 2]] = c(-2.0);
        let pairs = smallest_eigenpairs(&a, 2).unwrap();
        let (l0, v0) = &pairs[0];
        let (l1, v1) = &pairs[1];
        assert_relative_eq!(l0.re, -1.0, epsilon = 1e-12);
        assert_relative_eq!(l1.re, -1.0, epsilon = 1e-12);
        assert!(residual(&a, *l0, v0) < 1e-10);
        assert!(residual(&a, *l1, v1) < 1e-10);
        let overlap: Complex64 = v0.iter().zip(v1.iter()).map(|(x, y)| x.conj() * y).sum();
        assert!(overlap.norm() < 1e-8);
    }

    #[test]
    fn test_hermitian_eigenvalues() {
        let h = &QubitOperator::SigmaX.matrix() + &QubitOperator::SigmaZ.matrix();
        let values = hermitian_eigenvalues(&h).unwrap();
        assert_relative_eq!(values[0], -2f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(values[1], 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_k_is_capped() {
        let a = Array2::from_elem((2, 2), c(1.0));
        assert_eq!(smallest_eigenpairs(&a, 10).unwrap().len(), 2);
        assert_eq!(smallest_eigenpairs(&a, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(eigenvalues(&Array2::zeros((2, 3))).is_err());
        let mut a = Array2::zeros((2, 2));
        a[[0, 0]] = c(f64::NAN);
        assert!(eigenvalues(&a).is_err());
        assert!(hermitian_eigenvalues(&a).is_err());
        assert!(eigenvalues(&Array2::zeros((0, 0))).unwrap().is_empty());
        assert!(smallest_eigenpairs(&Array2::zeros((0, 0)), 3).unwrap().is_empty());
    }

    #[test]
    fn test_qubit_liouvillian_spectrum() {
        // H = σz/2, S(ω) = 1/(|ω| + 1): γ = 1/2, γφ = 1
        // Spectrum: 0, -γ, -γ/2 - 2γφ ± i
        let h = QubitOperator::SigmaZ.matrix().mapv(|z| z * 0.5);
        let l = colored_noise_liouvillian(&h, &SpectralDensity::new(1.0, 1.0, 1.0)).unwrap();
        let modes = liouvillian_spectrum(&l, 10).unwrap();
        assert_eq!(modes.len(), 4);

        assert_relative_eq!(modes[0].re, 0.0, epsilon = 1e-10);
        assert_relative_eq!(modes[0].im, 0.0, epsilon = 1e-10);
        assert_relative_eq!(modes[1].re, -0.5, epsilon = 1e-10);
        assert_relative_eq!(modes[1].im, 0.0, epsilon = 1e-10);

        let mut tail: Vec<f64> = modes[2..].iter().map(|m| m.im).collect();
        tail.sort_by(f64::total_cmp);
        assert_relative_eq!(modes[2].re, -2.25, epsilon = 1e-10);
        assert_relative_eq!(modes[3].re, -2.25, epsilon = 1e-10);
        assert_relative_eq!(tail[0], -1.0, epsilon = 1e-10);
        assert_relative_eq!(tail[1], 1.0, epsilon = 1e-10);

        for (i, m) in modes.iter().enumerate() {
            assert_eq!(m.index, i);
            assert_relative_eq!(m.purity, 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_steady_state_eigenvector() {
        // With relaxation only the zero mode is the ground state
        let h = QubitOperator::SigmaZ.matrix().mapv(|z| z * 0.5);
        let l = build_liouvillian(&h, &[CollapseOperator::lowering(0.3)]).unwrap();
        let pairs = smallest_eigenpairs(&l, 1).unwrap();
        let (lambda, v) = &pairs[0];
        assert_relative_eq!(lambda.norm(), 0.0, epsilon = 1e-10);
        assert!(residual(&l, *lambda, v) < 1e-10);
        let rho = vector_to_operator(v).unwrap();
        assert_relative_eq!(rho[[1, 1]].norm(), 1.0, epsilon = 1e-8);
        assert_relative_eq!(rho[[0, 0]].norm(), 0.0, epsilon = 1e-8);
    }
}
