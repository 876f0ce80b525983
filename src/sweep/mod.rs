// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Concentric-ring grid sweep.
//!
//! The sweep crosses ring counts with cat-pump strengths, derives the
//! measurement flip probability of each point from the pump-induced noise
//! bias and asks a [`CircuitEvaluator`](crate::evaluator::CircuitEvaluator)
//! for the logical error rate.
//!
//! # Example
//!
//! ```ignore
//! use cat_ring_sweep::evaluator::SurfaceCodeEvaluator;
//! use cat_ring_sweep::sweep::{persist_and_plot, run_sweep};
//!
//! let evaluator = SurfaceCodeEvaluator::new(Some(7));
//! let table = run_sweep(&evaluator, &[3, 5, 7], &[50.0, 150.0, 300.0], 10_000)?;
//! persist_and_plot(&table, "results".as_ref())?;
//! ```

pub mod output;
pub mod runner;
pub mod types;

pub use output::{persist_and_plot, SweepArtifacts, CSV_FILE_NAME, PLOT_FILE_NAME};
pub use runner::{run_sweep, SweepParameters, SweepRunner};
pub use types::{ResultRow, ResultTable, SweepPoint};
