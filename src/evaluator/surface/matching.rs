// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Minimum-weight perfect matching over a graph-like detector error model.
//!
//! Each detector is a vertex and one extra virtual vertex stands for the
//! code boundary. A mechanism with probability `p` becomes an edge of
//! weight `ln((1 - p) / p)`, scaled to an even integer for fusion-blossom,
//! carrying the mechanism's observable flip. The predicted flip of a shot
//! is the parity of the observable flags on the matched subgraph.

use std::collections::HashMap;

use fusion_blossom::mwpm_solver::{PrimalDualSolver, SolverSerial};
use fusion_blossom::util::{SolverInitializer, SyndromePattern, VertexIndex, VertexNum, Weight};
use tracing::debug;

use super::dem::DetectorErrorModel;
use crate::error::EvaluatorError;

/// Integer units per unit of log-likelihood weight.
pub const WEIGHT_SCALE: f64 = 1000.0;

/// Even integer weight of an edge with flip probability `p`.
pub fn edge_weight(p: f64) -> Weight {
    let p = p.clamp(1e-12, 0.5);
    let w = ((1.0 - p) / p).ln();
    ((w * WEIGHT_SCALE / 2.0).round() as Weight) * 2
}

fn find(parent: &mut [usize], mut v: usize) -> usize {
    while parent[v] != v {
        parent[v] = parent[parent[v]];
        v = parent[v];
    }
    v
}

/// Matching graph built from a detector error model.
#[derive(Debug, Clone)]
pub struct MatchingGraph {
    initializer: SolverInitializer,
    edge_flips: Vec<bool>,
    /// Connected-component root of every vertex
    component: Vec<usize>,
    /// Components that reach the boundary vertex
    reaches_boundary: Vec<bool>,
    boundary: usize,
}

impl MatchingGraph {
    /// Build the graph.
    ///
    /// Parallel edges keep the most likely mechanism. Mechanisms touching
    /// more than two detectors are sampled but left out of the graph; their
    /// single-fault parts are already edges.
    pub fn from_dem(dem: &DetectorErrorModel) -> Result<Self, EvaluatorError> {
        let boundary = dem.num_detectors as usize;
        let mut edges: HashMap<(usize, usize), (f64, bool)> = HashMap::new();
        let mut hyperedges = 0usize;

        for m in &dem.mechanisms {
            if m.probability <= 0.0 {
                continue;
            }
            if let Some(&bad) = m.detectors.iter().find(|&&d| d as usize >= boundary) {
                return Err(EvaluatorError::Decoding(format!(
                    "detector {} out of range ({} detectors)",
                    bad, dem.num_detectors
                )));
            }
            let (a, b) = match m.detectors.as_slice() {
                [a] => (*a as usize, boundary),
                [a, b] => (*a as usize, *b as usize),
                [] => continue,
                _ => {
                    hyperedges += 1;
                    continue;
                }
            };
            let key = (a.min(b), a.max(b));
            match edges.get(&key) {
                Some(&(p, _)) if p >= m.probability => {}
                _ => {
                    edges.insert(key, (m.probability, m.flips_observable));
                }
            }
        }

        let mut parent: Vec<usize> = (0..=boundary).collect();
        let mut keys: Vec<(usize, usize)> = edges.keys().copied().collect();
        keys.sort_unstable();

        let mut weighted_edges = Vec::with_capacity(keys.len());
        let mut edge_flips = Vec::with_capacity(keys.len());
        for (a, b) in keys {
            let (p, flips) = edges[&(a, b)];
            weighted_edges.push((a as VertexIndex, b as VertexIndex, edge_weight(p)));
            edge_flips.push(flips);

            let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
            if ra != rb {
                parent[ra] = rb;
            }
        }

        let component: Vec<usize> = (0..=boundary).map(|v| find(&mut parent, v)).collect();
        let mut reaches_boundary = vec![false; boundary + 1];
        reaches_boundary[component[boundary]] = true;

        debug!(
            detectors = boundary,
            edges = weighted_edges.len(),
            hyperedges,
            "Built matching graph"
        );

        let initializer = SolverInitializer::new(
            (boundary + 1) as VertexNum,
            weighted_edges,
            vec![boundary as VertexIndex],
        );

        Ok(Self {
            initializer,
            edge_flips,
            component,
            reaches_boundary,
            boundary,
        })
    }

    /// Number of detector vertices (excluding the boundary).
    pub fn num_detectors(&self) -> usize {
        self.boundary
    }

    /// Number of edges handed to the solver.
    pub fn num_edges(&self) -> usize {
        self.edge_flips.len()
    }

    /// A decoder with its own solver state.
    pub fn decoder(&self) -> MatchingDecoder<'_> {
        MatchingDecoder {
            graph: self,
            solver: SolverSerial::new(&self.initializer),
        }
    }

    fn check_syndrome(&self, defects: &[u32]) -> Result<(), EvaluatorError> {
        if let Some(&bad) = defects.iter().find(|&&d| d as usize >= self.boundary) {
            return Err(EvaluatorError::Decoding(format!(
                "defect {} outside graph of {} detectors",
                bad, self.boundary
            )));
        }

        // An odd defect count in a component cut off from the boundary has
        // no perfect matching.
        let mut odd: HashMap<usize, bool> = HashMap::new();
        for &d in defects {
            let root = self.component[d as usize];
            if !self.reaches_boundary[root] {
                *odd.entry(root).or_insert(false) ^= true;
            }
        }
        if odd.values().any(|&o| o) {
            return Err(EvaluatorError::Decoding(format!(
                "no valid matching for {} defects; the boundary is unreachable",
                defects.len()
            )));
        }
        Ok(())
    }
}

/// Serial blossom solver bound to one matching graph.
pub struct MatchingDecoder<'a> {
    graph: &'a MatchingGraph,
    solver: SolverSerial,
}

impl MatchingDecoder<'_> {
    /// Decode one syndrome given as fired detector indices.
    ///
    /// Returns the predicted observable flip.
    pub fn decode(&mut self, defects: &[u32]) -> Result<bool, EvaluatorError> {
        if defects.is_empty() {
            return Ok(false);
        }
        self.graph.check_syndrome(defects)?;

        let syndrome =
            SyndromePattern::new_vertices(defects.iter().map(|&d| d as VertexIndex).collect());
        self.solver.solve(&syndrome);
        let flip = self
            .solver
            .subgraph()
            .iter()
            .fold(false, |acc, &e| acc ^ self.graph.edge_flips[e as usize]);
        self.solver.clear();

        Ok(flip)
    }
}
