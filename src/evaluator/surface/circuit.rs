// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Noisy rotated-surface-code memory-X circuit.
//!
//! The circuit prepares every data qubit in |+>, runs `rounds` rounds of
//! stabilizer extraction and reads all data qubits out in the X basis.
//! Noise enters as depolarization of strength `p` after each Hadamard and
//! CNOT, and as a flip of probability `q` before each measurement.
//!
//! Detector `D(t, s)` compares X stabilizer `s` between round `t - 1` and
//! round `t`. Round 0 compares against the deterministic preparation and
//! layer `rounds` is reconstructed from the final data readout.
//!
//! The detector error model is derived by pushing every single-qubit Pauli
//! fault forward through the rest of the circuit as a Pauli frame. Each
//! depolarizing component is treated as an independent mechanism of
//! probability `p / 3` (one qubit) or `p / 15` (two qubits).

use std::collections::BTreeSet;

use super::dem::DetectorErrorModel;
use super::layout::RotatedLayout;
use crate::error::EvaluatorError;

/// One circuit instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Reset to |0>
    Reset(Vec<usize>),
    /// Reset to |+>
    ResetX(Vec<usize>),
    /// Hadamard
    Hadamard(Vec<usize>),
    /// One layer of CNOTs as `(control, target)` pairs
    Cnot(Vec<(usize, usize)>),
    /// Z-basis measurement followed by reset to |0>
    MeasureReset(Vec<usize>),
    /// X-basis measurement
    MeasureX(Vec<usize>),
    /// Single-qubit depolarizing channel
    Depolarize1(Vec<usize>, f64),
    /// Two-qubit depolarizing channel
    Depolarize2(Vec<(usize, usize)>, f64),
    /// Pauli X with the given probability
    XError(Vec<usize>, f64),
    /// Pauli Z with the given probability
    ZError(Vec<usize>, f64),
}

/// Detectors and observable flip caused by one fault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultEffect {
    /// Flipped detectors
    pub detectors: BTreeSet<u32>,
    /// Whether the logical observable flips
    pub flips_observable: bool,
}

impl FaultEffect {
    /// Effect of two faults occurring together.
    pub fn combine(&self, other: &FaultEffect) -> FaultEffect {
        FaultEffect {
            detectors: self
                .detectors
                .symmetric_difference(&other.detectors)
                .copied()
                .collect(),
            flips_observable: self.flips_observable ^ other.flips_observable,
        }
    }

    fn toggle(&mut self, detector: u32) {
        if !self.detectors.remove(&detector) {
            self.detectors.insert(detector);
        }
    }
}

/// Pauli frame on every qubit of the circuit.
#[derive(Debug, Clone)]
struct PauliFrame {
    x: Vec<bool>,
    z: Vec<bool>,
}

impl PauliFrame {
    fn new(num_qubits: usize) -> Self {
        Self {
            x: vec![false; num_qubits],
            z: vec![false; num_qubits],
        }
    }

    /// Push the frame through one instruction, reporting flipped
    /// measurement indices starting at `*measurement`.
    fn apply(
        &mut self,
        instruction: &Instruction,
        measurement: &mut usize,
        flipped: &mut Vec<usize>,
    ) {
        match instruction {
            Instruction::Reset(qubits) | Instruction::ResetX(qubits) => {
                for &q in qubits {
                    self.x[q] = false;
                    self.z[q] = false;
                }
            }
            Instruction::Hadamard(qubits) => {
                for &q in qubits {
                    std::mem::swap(&mut self.x[q], &mut self.z[q]);
                }
            }
            Instruction::Cnot(pairs) => {
                for &(c, t) in pairs {
                    self.x[t] ^= self.x[c];
                    self.z[c] ^= self.z[t];
                }
            }
            Instruction::MeasureReset(qubits) => {
                for &q in qubits {
                    if self.x[q] {
                        flipped.push(*measurement);
                    }
                    *measurement += 1;
                    self.x[q] = false;
                    self.z[q] = false;
                }
            }
            Instruction::MeasureX(qubits) => {
                for &q in qubits {
                    if self.z[q] {
                        flipped.push(*measurement);
                    }
                    *measurement += 1;
                }
            }
            Instruction::Depolarize1(..)
            | Instruction::Depolarize2(..)
            | Instruction::XError(..)
            | Instruction::ZError(..) => {}
        }
    }

    fn is_identity(&self) -> bool {
        !self.x.iter().chain(&self.z).any(|&b| b)
    }
}

fn add_effect(dem: &mut DetectorErrorModel, probability: f64, effect: FaultEffect) {
    dem.add(
        probability,
        effect.detectors.into_iter().collect(),
        effect.flips_observable,
    );
}

fn measurement_count(instruction: &Instruction) -> usize {
    match instruction {
        Instruction::MeasureReset(qubits) | Instruction::MeasureX(qubits) => qubits.len(),
        _ => 0,
    }
}

/// A generated memory-X experiment.
#[derive(Debug, Clone)]
pub struct MemoryCircuit {
    layout: RotatedLayout,
    rounds: u32,
    num_qubits: usize,
    instructions: Vec<Instruction>,
    /// Measurements recorded before each instruction
    measurement_offsets: Vec<usize>,
    /// Detectors each measurement feeds
    detectors_of_measurement: Vec<Vec<u32>>,
    /// Measurements whose parity is the logical observable
    observable_measurements: Vec<bool>,
}

impl MemoryCircuit {
    /// Generate the rotated memory-X circuit.
    pub fn generated(
        distance: u32,
        rounds: u32,
        after_clifford_depolarization: f64,
        before_measure_flip_probability: f64,
    ) -> Result<Self, EvaluatorError> {
        if rounds == 0 {
            return Err(EvaluatorError::InvalidCircuit(
                "memory circuit needs at least one round".into(),
            ));
        }
        let layout = RotatedLayout::new(distance)?;
        let p = after_clifford_depolarization;
        let q = before_measure_flip_probability;

        let num_data = layout.num_data_qubits();
        let num_x = layout.x_stabilizers().len();
        let num_z = layout.z_stabilizers().len();
        let data: Vec<usize> = (0..num_data).collect();
        let x_ancillas: Vec<usize> = (num_data..num_data + num_x).collect();
        let ancillas: Vec<usize> = (num_data..num_data + num_x + num_z).collect();

        let mut layers: Vec<Vec<(usize, usize)>> = vec![Vec::new(); 4];
        for (s, plaquette) in layout.x_stabilizers().iter().enumerate() {
            for (layer, partner) in plaquette.cnot_order(distance).into_iter().enumerate() {
                if let Some(d) = partner {
                    layers[layer].push((num_data + s, d));
                }
            }
        }
        for (s, plaquette) in layout.z_stabilizers().iter().enumerate() {
            for (layer, partner) in plaquette.cnot_order(distance).into_iter().enumerate() {
                if let Some(d) = partner {
                    layers[layer].push((d, num_data + num_x + s));
                }
            }
        }

        let mut instructions = vec![
            Instruction::ResetX(data.clone()),
            Instruction::Reset(ancillas.clone()),
        ];
        for _ in 0..rounds {
            instructions.push(Instruction::Hadamard(x_ancillas.clone()));
            instructions.push(Instruction::Depolarize1(x_ancillas.clone(), p));
            for layer in &layers {
                instructions.push(Instruction::Cnot(layer.clone()));
                instructions.push(Instruction::Depolarize2(layer.clone(), p));
            }
            instructions.push(Instruction::Hadamard(x_ancillas.clone()));
            instructions.push(Instruction::Depolarize1(x_ancillas.clone(), p));
            instructions.push(Instruction::XError(ancillas.clone(), q));
            instructions.push(Instruction::MeasureReset(ancillas.clone()));
        }
        instructions.push(Instruction::ZError(data.clone(), q));
        instructions.push(Instruction::MeasureX(data));

        let mut measurement_offsets = Vec::with_capacity(instructions.len() + 1);
        let mut total = 0;
        for instruction in &instructions {
            measurement_offsets.push(total);
            total += measurement_count(instruction);
        }

        // Ancillas are measured X block first, once per round, then data.
        let per_round = num_x + num_z;
        let ancilla_measurement = |t: u32, s: usize| t as usize * per_round + s;
        let data_measurement = |qubit: usize| rounds as usize * per_round + qubit;
        let detector = |t: u32, s: usize| t * num_x as u32 + s as u32;

        let mut detectors_of_measurement = vec![Vec::new(); total];
        for t in 0..rounds {
            for s in 0..num_x {
                detectors_of_measurement[ancilla_measurement(t, s)].push(detector(t, s));
                detectors_of_measurement[ancilla_measurement(t, s)].push(detector(t + 1, s));
            }
        }
        for qubit in 0..num_data {
            for &s in layout.x_stabilizers_of(qubit) {
                detectors_of_measurement[data_measurement(qubit)].push(detector(rounds, s));
            }
        }

        let mut observable_measurements = vec![false; total];
        for qubit in (0..num_data).filter(|&qubit| layout.in_observable(qubit)) {
            observable_measurements[data_measurement(qubit)] = true;
        }

        Ok(Self {
            layout,
            rounds,
            num_qubits: num_data + num_x + num_z,
            instructions,
            measurement_offsets,
            detectors_of_measurement,
            observable_measurements,
        })
    }

    /// Code layout.
    pub fn layout(&self) -> &RotatedLayout {
        &self.layout
    }

    /// Number of extraction rounds.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Data plus ancilla qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Instruction list.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of detectors: one per X stabilizer per layer.
    pub fn num_detectors(&self) -> u32 {
        (self.rounds + 1) * self.layout.x_stabilizers().len() as u32
    }

    /// Effect of a Pauli on `qubit` inserted before instruction `start`.
    pub fn fault_effect(&self, start: usize, qubit: usize, x: bool, z: bool) -> FaultEffect {
        let mut frame = PauliFrame::new(self.num_qubits);
        frame.x[qubit] = x;
        frame.z[qubit] = z;

        let start = start.min(self.instructions.len());
        let mut measurement = self
            .measurement_offsets
            .get(start)
            .copied()
            .unwrap_or(self.detectors_of_measurement.len());
        let mut flipped = Vec::new();
        for instruction in &self.instructions[start..] {
            frame.apply(instruction, &mut measurement, &mut flipped);
            if frame.is_identity() {
                break;
            }
        }

        let mut effect = FaultEffect::default();
        for m in flipped {
            for &det in &self.detectors_of_measurement[m] {
                effect.toggle(det);
            }
            effect.flips_observable ^= self.observable_measurements[m];
        }
        effect
    }

    /// `(X, Z)` fault effects on `qubit` before instruction `start`.
    fn basis_effects(&self, start: usize, qubit: usize) -> [FaultEffect; 2] {
        [
            self.fault_effect(start, qubit, true, false),
            self.fault_effect(start, qubit, false, true),
        ]
    }

    /// Derive the detector error model of the circuit.
    pub fn detector_error_model(&self) -> DetectorErrorModel {
        let mut dem = DetectorErrorModel::new(self.num_detectors());

        for (i, instruction) in self.instructions.iter().enumerate() {
            let next = i + 1;
            match instruction {
                Instruction::Depolarize1(qubits, p) if *p > 0.0 => {
                    for &q in qubits {
                        let [ex, ez] = self.basis_effects(next, q);
                        let ey = ex.combine(&ez);
                        for effect in [ex, ez, ey] {
                            add_effect(&mut dem, p / 3.0, effect);
                        }
                    }
                }
                Instruction::Depolarize2(pairs, p) if *p > 0.0 => {
                    for &(a, b) in pairs {
                        let [xa, za] = self.basis_effects(next, a);
                        let [xb, zb] = self.basis_effects(next, b);
                        let basis = [xa, za, xb, zb];
                        // Bits 0..4 select X_a, Z_a, X_b, Z_b
                        for k in 1u32..16 {
                            let effect = (0..4usize)
                                .filter(|&bit| k & (1 << bit) != 0)
                                .fold(FaultEffect::default(), |acc, bit| acc.combine(&basis[bit]));
                            add_effect(&mut dem, p / 15.0, effect);
                        }
                    }
                }
                Instruction::XError(qubits, p) if *p > 0.0 => {
                    for &q in qubits {
                        add_effect(&mut dem, *p, self.fault_effect(next, q, true, false));
                    }
                }
                Instruction::ZError(qubits, p) if *p > 0.0 => {
                    for &q in qubits {
                        add_effect(&mut dem, *p, self.fault_effect(next, q, false, true));
                    }
                }
                _ => {}
            }
        }

        dem
    }
}
