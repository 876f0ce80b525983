// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Monte-Carlo syndrome sampling from a detector error model.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::dem::DetectorErrorModel;

/// One sampled shot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shot {
    /// Packed detector outcomes, one bit per detector
    pub syndrome: Vec<u64>,
    /// Whether the logical observable actually flipped
    pub observable_flipped: bool,
}

impl Shot {
    /// Indices of the fired detectors, ascending.
    pub fn defects(&self) -> Vec<u32> {
        let mut defects = Vec::new();
        for (w, &word) in self.syndrome.iter().enumerate() {
            let mut bits = word;
            while bits != 0 {
                let b = bits.trailing_zeros();
                defects.push(w as u32 * 64 + b);
                bits &= bits - 1;
            }
        }
        defects
    }
}

/// Sampler over a detector error model.
///
/// Candidate mechanisms are reached by geometric skips at the largest
/// mechanism probability `p_max`; each candidate then fires with
/// probability `p / p_max`. A shot costs about `p_max * len` draws instead
/// of one draw per mechanism.
pub struct DemSampler {
    probabilities: Vec<f64>,
    detector_targets: Vec<Vec<u32>>,
    observable_flips: Vec<bool>,
    num_words: usize,
    max_probability: f64,
    /// `ln(1 - p_max)`
    log_miss: f64,
    rng: Xoshiro256PlusPlus,
}

impl DemSampler {
    /// Create a sampler seeded with `seed`.
    pub fn new(dem: &DetectorErrorModel, seed: u64) -> Self {
        let probabilities: Vec<f64> = dem
            .mechanisms
            .iter()
            .map(|m| m.probability.clamp(0.0, 1.0))
            .collect();
        let max_probability = probabilities.iter().copied().fold(0.0, f64::max);
        Self {
            probabilities,
            detector_targets: dem.mechanisms.iter().map(|m| m.detectors.clone()).collect(),
            observable_flips: dem.mechanisms.iter().map(|m| m.flips_observable).collect(),
            num_words: (dem.num_detectors as usize).div_ceil(64),
            max_probability,
            log_miss: (1.0 - max_probability).ln(),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Mechanisms skipped before the next candidate.
    fn next_gap(&mut self) -> usize {
        if self.max_probability >= 1.0 {
            return 0;
        }
        // 1 - U lies in (0, 1]
        let u = 1.0 - self.rng.gen::<f64>();
        (u.ln() / self.log_miss).floor() as usize
    }

    /// Sample one shot.
    pub fn sample(&mut self) -> Shot {
        let mut syndrome = vec![0u64; self.num_words];
        let mut observable_flipped = false;
        if self.max_probability <= 0.0 {
            return Shot {
                syndrome,
                observable_flipped,
            };
        }

        let mut i = self.next_gap();
        while i < self.probabilities.len() {
            if self.rng.gen::<f64>() * self.max_probability < self.probabilities[i] {
                for &det in &self.detector_targets[i] {
                    syndrome[det as usize / 64] ^= 1 << (det % 64);
                }
                observable_flipped ^= self.observable_flips[i];
            }
            i = i.saturating_add(1).saturating_add(self.next_gap());
        }

        Shot {
            syndrome,
            observable_flipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_dem() -> DetectorErrorModel {
        let mut dem = DetectorErrorModel::new(70);
        dem.add(0.5, vec![0, 1], false);
        dem.add(0.5, vec![65, 69], true);
        dem
    }

    #[test]
    fn test_syndrome_width() {
        let mut sampler = DemSampler::new(&pair_dem(), 42);
        assert_eq!(sampler.sample().syndrome.len(), 2);
    }

    #[test]
    fn test_pair_mechanisms_give_even_parity() {
        let mut sampler = DemSampler::new(&pair_dem(), 12345);
        for _ in 0..200 {
            let shot = sampler.sample();
            assert_eq!(shot.defects().len() % 2, 0);
            // The observable flips exactly when the high pair fires
            let high = shot.defects().contains(&65);
            assert_eq!(high, shot.observable_flipped);
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let dem = pair_dem();
        let mut a = DemSampler::new(&dem, 7);
        let mut b = DemSampler::new(&dem, 7);
        for _ in 0..50 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_firing_frequencies_match_probabilities() {
        let mut dem = DetectorErrorModel::new(3);
        dem.add(0.3, vec![0], false);
        dem.add(0.05, vec![1], false);
        dem.add(0.01, vec![2], true);
        let mut sampler = DemSampler::new(&dem, 2718);

        let shots = 40_000;
        let mut counts = [0u32; 3];
        for _ in 0..shots {
            let shot = sampler.sample();
            for d in shot.defects() {
                counts[d as usize] += 1;
            }
            assert_eq!(shot.defects().contains(&2), shot.observable_flipped);
        }
        let freq: Vec<f64> = counts.iter().map(|&c| c as f64 / shots as f64).collect();
        assert!((freq[0] - 0.3).abs() < 0.015, "{:?}", freq);
        assert!((freq[1] - 0.05).abs() < 0.006, "{:?}", freq);
        assert!((freq[2] - 0.01).abs() < 0.003, "{:?}", freq);
    }

    #[test]
    fn test_empty_model_never_fires() {
        let mut sampler = DemSampler::new(&DetectorErrorModel::new(5), 1);
        for _ in 0..10 {
            let shot = sampler.sample();
            assert!(shot.defects().is_empty());
            assert!(!shot.observable_flipped);
        }
    }

    #[test]
    fn test_defects_decoding() {
        let shot = Shot {
            syndrome: vec![0b1010, 1],
            observable_flipped: false,
        };
        assert_eq!(shot.defects(), vec![1, 3, 64]);
    }
}
