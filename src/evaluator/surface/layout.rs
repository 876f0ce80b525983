// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Rotated surface-code geometry.
//!
//! Data qubits sit on a `d x d` grid. Stabilizer plaquettes sit on the
//! `(d+1) x (d+1)` grid of corners; plaquette `(i, j)` acts on the data
//! qubits at rows `i-1, i` and columns `j-1, j` that exist.
//!
//! - Bulk plaquettes: X-type when `i + j` is even, Z-type otherwise.
//! - Top and bottom boundaries carry the weight-2 X plaquettes.
//! - Left and right boundaries carry the weight-2 Z plaquettes.
//!
//! With this orientation the logical X operator is any column of data
//! qubits; column 0 is used as the measured observable.

use crate::error::EvaluatorError;

/// Stabilizer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizerKind {
    /// Product of Pauli X
    X,
    /// Product of Pauli Z
    Z,
}

/// One stabilizer plaquette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plaquette {
    /// Stabilizer type
    pub kind: StabilizerKind,
    /// Corner coordinates `(i, j)`
    pub corner: (u32, u32),
    /// Data-qubit indices in its support (row-major)
    pub qubits: Vec<usize>,
}

impl Plaquette {
    /// Number of data qubits in the support.
    pub fn weight(&self) -> usize {
        self.qubits.len()
    }

    /// Data qubit the ancilla couples to in each of the four CNOT layers.
    ///
    /// X plaquettes go TL, TR, BL, BR; Z plaquettes go TL, BL, TR, BR.
    /// Missing corners of boundary plaquettes leave their layer empty. With
    /// this order a Z-ancilla fault after the second CNOT spreads to a
    /// vertical data pair.
    pub fn cnot_order(&self, distance: u32) -> [Option<usize>; 4] {
        let (i, j) = self.corner;
        let at = |r: u32, c: u32| {
            (r < distance && c < distance).then(|| (r * distance + c) as usize)
        };
        let (top, bottom) = (i.wrapping_sub(1), i);
        let (left, right) = (j.wrapping_sub(1), j);
        match self.kind {
            StabilizerKind::X => [
                at(top, left),
                at(top, right),
                at(bottom, left),
                at(bottom, right),
            ],
            StabilizerKind::Z => [
                at(top, left),
                at(bottom, left),
                at(top, right),
                at(bottom, right),
            ],
        }
    }
}

/// Rotated surface-code layout of odd distance.
#[derive(Debug, Clone)]
pub struct RotatedLayout {
    distance: u32,
    x_stabilizers: Vec<Plaquette>,
    z_stabilizers: Vec<Plaquette>,
    /// X stabilizer indices containing each data qubit
    x_membership: Vec<Vec<usize>>,
}

impl RotatedLayout {
    /// Build the layout for distance `d`.
    pub fn new(distance: u32) -> Result<Self, EvaluatorError> {
        if distance < 3 || distance % 2 == 0 {
            return Err(EvaluatorError::InvalidCircuit(format!(
                "rotated layout needs an odd distance of at least 3, got {}",
                distance
            )));
        }

        let d = distance;
        let mut x_stabilizers = Vec::new();
        let mut z_stabilizers = Vec::new();

        for i in 0..=d {
            for j in 0..=d {
                let on_row_edge = i == 0 || i == d;
                let on_col_edge = j == 0 || j == d;
                let even = (i + j) % 2 == 0;

                let kind = match (on_row_edge, on_col_edge) {
                    // Corners never carry a stabilizer
                    (true, true) => continue,
                    (false, false) if even => StabilizerKind::X,
                    (false, false) => StabilizerKind::Z,
                    (true, false) if even => StabilizerKind::X,
                    (false, true) if !even => StabilizerKind::Z,
                    _ => continue,
                };

                let plaquette = Plaquette {
                    kind,
                    corner: (i, j),
                    qubits: support(d, i, j),
                };
                match kind {
                    StabilizerKind::X => x_stabilizers.push(plaquette),
                    StabilizerKind::Z => z_stabilizers.push(plaquette),
                }
            }
        }

        let num_data = (d * d) as usize;
        let mut x_membership = vec![Vec::new(); num_data];
        for (s, plaquette) in x_stabilizers.iter().enumerate() {
            for &q in &plaquette.qubits {
                x_membership[q].push(s);
            }
        }

        Ok(Self {
            distance,
            x_stabilizers,
            z_stabilizers,
            x_membership,
        })
    }

    /// Code distance.
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Number of data qubits.
    pub fn num_data_qubits(&self) -> usize {
        (self.distance * self.distance) as usize
    }

    /// X-type stabilizers, in detector order.
    pub fn x_stabilizers(&self) -> &[Plaquette] {
        &self.x_stabilizers
    }

    /// Z-type stabilizers.
    pub fn z_stabilizers(&self) -> &[Plaquette] {
        &self.z_stabilizers
    }

    /// Indices of the X stabilizers that contain data qubit `q`.
    pub fn x_stabilizers_of(&self, q: usize) -> &[usize] {
        &self.x_membership[q]
    }

    /// Whether data qubit `q` lies in the logical-X support.
    pub fn in_observable(&self, q: usize) -> bool {
        q % self.distance as usize == 0
    }
}

fn support(d: u32, i: u32, j: u32) -> Vec<usize> {
    let mut qubits = Vec::with_capacity(4);
    for r in [i.wrapping_sub(1), i] {
        for c in [j.wrapping_sub(1), j] {
            if r < d && c < d {
                qubits.push((r * d + c) as usize);
            }
        }
    }
    qubits
}
