// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sweep grid points and result tables.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// One (ring count, cat-pump strength) grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// Number of concentric rings; used as the round count
    pub ring_count: u32,
    /// Two-photon pump strength kappa2 in kHz
    pub pump_strength_khz: f64,
}

impl SweepPoint {
    /// Create a grid point.
    pub fn new(ring_count: u32, pump_strength_khz: f64) -> Self {
        Self {
            ring_count,
            pump_strength_khz,
        }
    }

    /// Noise bias relative to `reference_hz`.
    pub fn bias(&self, reference_hz: f64) -> f64 {
        self.pump_strength_khz * 1000.0 / reference_hz
    }

    /// Measurement flip probability: the physical rate suppressed by the bias.
    pub fn measurement_flip_probability(&self, physical_error_rate: f64, reference_hz: f64) -> f64 {
        physical_error_rate / self.bias(reference_hz)
    }
}

/// One row of the result table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "N_r")]
    pub ring_count: u32,
    #[serde(rename = "kappa2_kHz")]
    pub pump_strength_khz: f64,
    #[serde(rename = "eps_log")]
    pub logical_error_rate: f64,
}

/// Ordered sweep results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Column names, in order.
    pub const COLUMNS: [&'static str; 3] = ["N_r", "kappa2_kHz", "eps_log"];

    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. A second row for the same grid point is rejected.
    pub fn push(&mut self, row: ResultRow) -> Result<()> {
        let duplicate = self.rows.iter().any(|r| {
            r.ring_count == row.ring_count && r.pump_strength_khz == row.pump_strength_khz
        });
        if duplicate {
            return Err(ValidationError::Field {
                field: "result_table".into(),
                message: format!(
                    "duplicate row for N_r={} kappa2_kHz={}",
                    row.ring_count, row.pump_strength_khz
                ),
            }
            .into());
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct ring counts in first-seen order.
    pub fn ring_counts(&self) -> Vec<u32> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.ring_count) {
                seen.push(row.ring_count);
            }
        }
        seen
    }

    /// `(kappa2_kHz, eps_log)` series per ring count, in first-seen order.
    pub fn series_by_ring(&self) -> Vec<(u32, Vec<(f64, f64)>)> {
        self.ring_counts()
            .into_iter()
            .map(|n| {
                let points = self
                    .rows
                    .iter()
                    .filter(|r| r.ring_count == n)
                    .map(|r| (r.pump_strength_khz, r.logical_error_rate))
                    .collect();
                (n, points)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(n: u32, k: f64, eps: f64) -> ResultRow {
        ResultRow {
            ring_count: n,
            pump_strength_khz: k,
            logical_error_rate: eps,
        }
    }

    #[test]
    fn test_bias_and_flip_probability() {
        let point = SweepPoint::new(3, 50.0);
        assert_relative_eq!(point.bias(50_000.0), 1.0);
        assert_relative_eq!(point.measurement_flip_probability(1e-3, 50_000.0), 1e-3);

        let point = SweepPoint::new(3, 300.0);
        assert_relative_eq!(point.bias(50_000.0), 6.0);
        assert_relative_eq!(
            point.measurement_flip_probability(1e-3, 50_000.0),
            1e-3 / 6.0
        );
    }

    #[test]
    fn test_flip_probability_decreases_with_pump() {
        let weak = SweepPoint::new(5, 50.0).measurement_flip_probability(1e-3, 50_000.0);
        let strong = SweepPoint::new(5, 150.0).measurement_flip_probability(1e-3, 50_000.0);
        assert!(strong < weak);
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut table = ResultTable::new();
        table.push(row(3, 50.0, 0.1)).unwrap();
        table.push(row(3, 150.0, 0.1)).unwrap();
        assert!(table.push(row(3, 50.0, 0.2)).is_err());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_grouping_views() {
        let mut table = ResultTable::new();
        for n in [7, 3] {
            for k in [50.0, 150.0] {
                table.push(row(n, k, n as f64 / k)).unwrap();
            }
        }
        assert_eq!(table.ring_counts(), vec![7, 3]);

        let series = table.series_by_ring();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, 7);
        assert_eq!(series[0].1, vec![(50.0, 7.0 / 50.0), (150.0, 7.0 / 150.0)]);
    }

    #[test]
    fn test_empty_table() {
        let table = ResultTable::new();
        assert!(table.is_empty());
        assert!(table.ring_counts().is_empty());
        assert!(table.series_by_ring().is_empty());
    }
}
