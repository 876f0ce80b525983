// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Detector error model: independent mechanisms over detectors.

use std::collections::HashMap;

/// Probability that an odd number of two independent events occur.
pub fn xor_probability(a: f64, b: f64) -> f64 {
    a * (1.0 - b) + b * (1.0 - a)
}

/// One independent error mechanism.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorMechanism {
    /// Probability the mechanism fires in a shot
    pub probability: f64,
    /// Detectors it flips, sorted
    pub detectors: Vec<u32>,
    /// Whether it flips the logical observable
    pub flips_observable: bool,
}

/// Detector error model: independent mechanisms over a set of detectors.
#[derive(Debug, Clone, Default)]
pub struct DetectorErrorModel {
    /// Number of detectors
    pub num_detectors: u32,
    /// Error mechanisms
    pub mechanisms: Vec<ErrorMechanism>,
    index: HashMap<(Vec<u32>, bool), usize>,
}

impl DetectorErrorModel {
    /// Create an empty model over `num_detectors` detectors.
    pub fn new(num_detectors: u32) -> Self {
        Self {
            num_detectors,
            ..Default::default()
        }
    }

    /// Add a mechanism, merging it into an identical one if present.
    ///
    /// Zero-probability mechanisms and mechanisms that flip nothing are
    /// dropped.
    pub fn add(&mut self, probability: f64, mut detectors: Vec<u32>, flips_observable: bool) {
        if probability <= 0.0 || (detectors.is_empty() && !flips_observable) {
            return;
        }
        detectors.sort_unstable();

        let key = (detectors, flips_observable);
        if let Some(&i) = self.index.get(&key) {
            let m = &mut self.mechanisms[i];
            m.probability = xor_probability(m.probability, probability);
            return;
        }

        self.index.insert(key.clone(), self.mechanisms.len());
        self.mechanisms.push(ErrorMechanism {
            probability,
            detectors: key.0,
            flips_observable: key.1,
        });
    }

    /// Number of mechanisms.
    pub fn len(&self) -> usize {
        self.mechanisms.len()
    }

    /// Whether the model has no mechanisms.
    pub fn is_empty(&self) -> bool {
        self.mechanisms.is_empty()
    }
}
