// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Cat-qubit ring sweep and colored-noise Liouvillian tools.
//!
//! This crate estimates how the logical error rate of a biased-noise surface
//! code memory depends on the number of concentric rings and the cat-pump
//! strength, and diagonalizes the Liouvillian of a qubit in a colored-noise
//! bath.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  grid-sweep          │   │  solve-liouvillian   │
//! ├──────────────────────┤   ├──────────────────────┤
//! │  Sweep Runner        │   │  Hamiltonian parser  │
//! │  CSV + scatter plot  │   │  Superoperator       │
//! ├──────────────────────┤   │  Schur eigen-solve   │
//! │  CircuitEvaluator    │   └──────────────────────┘
//! │  (surface-code DEM,  │
//! │   matching decoder)  │
//! └──────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`sweep`]: Grid sweep, result table, persistence and plotting
//! - [`evaluator`]: Noisy-circuit evaluator trait and surface-code evaluator
//! - [`lindblad`]: Colored-noise Liouvillian construction and spectrum
//! - [`validation`]: Input validation utilities
//! - [`logging`]: Tracing subscriber setup
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod evaluator;
pub mod lindblad;
pub mod logging;
pub mod sweep;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
