// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lindblad Liouvillian of a qubit coupled to a colored-noise bath.
//!
//! Implements the Gorini–Kossakowski–Sudarshan–Lindblad (GKSL) generator:
//!
//!   L(ρ) = -i[H, ρ] + Σ_k γ_k (L_k ρ L_k† − ½{L_k†L_k, ρ})
//!
//! The bath enters through a spectral density S(ω) = A / (|ω|^α + ω_c^α):
//! relaxation (σ⁻) at rate S(ω₀), where ω₀ is the spread of the Hamiltonian's
//! eigenvalues, and dephasing (σz) at rate S(0).
//!
//! This module provides:
//! - A parser for single-qubit Hamiltonian expressions
//! - Dense construction of the d² × d² superoperator
//! - Its low-lying spectrum from a complex Schur decomposition (nalgebra)
//!
//! # Example
//!
//! ```ignore
//! use cat_ring_sweep::lindblad::{
//!     colored_noise_liouvillian, liouvillian_spectrum, parse_hamiltonian, SpectralDensity,
//! };
//!
//! let h = parse_hamiltonian("0.5*sigmaz()")?;
//! let l = colored_noise_liouvillian(&h, &SpectralDensity::new(1e-4, 1.0, 5.0))?;
//! for mode in liouvillian_spectrum(&l, 10)? {
//!     println!("{}\t{:.6e}\t{:.6e}\t{:.6}", mode.index, mode.re, mode.im, mode.purity);
//! }
//! ```
//!
//! # References
//!
//! - Lindblad, G. (1976). Commun. Math. Phys. 48, 119.
//! - Breuer, H.-P. & Petruccione, F. (2002). "The Theory of Open Quantum Systems." Oxford.

pub mod dissipator;
pub mod eigen;
pub mod hamiltonian;
pub mod superoperator;
pub mod types;

pub use eigen::{eigenvalues, hermitian_eigenvalues, liouvillian_spectrum, smallest_eigenpairs};
pub use hamiltonian::parse_hamiltonian;
pub use superoperator::{
    build_liouvillian, colored_noise_liouvillian, operator_to_vector, vector_to_operator,
};
pub use types::{CollapseOperator, EigenMode, QubitOperator, SpectralDensity};
