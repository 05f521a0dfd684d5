//! Input standardization, train/test splitting and evaluation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::stats::{mean, stddev};

/// Per-column z-scoring with population standard deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Learns column means and deviations from a row-major matrix.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        let mut means = Vec::with_capacity(width);
        let mut scales = Vec::with_capacity(width);

        for col in 0..width {
            let column: Vec<f64> = rows.iter().map(|r| r[col]).collect();
            let m = mean(&column);
            means.push(m);
            scales.push(stddev(&column, m));
        }

        Self { means, scales }
    }

    /// Zero-variance columns map to 0.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .zip(self.means.iter().zip(&self.scales))
                    .map(|(v, (m, s))| if *s == 0.0 { 0.0 } else { (v - m) / s })
                    .collect()
            })
            .collect()
    }

    pub fn fit_transform(rows: &[Vec<f64>]) -> (Self, Vec<Vec<f64>>) {
        let scaler = Self::fit(rows);
        let scaled = scaler.transform(rows);
        (scaler, scaled)
    }
}

/// Row indices of a seeded shuffle split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffles `0..n` with `seed` and holds out `ceil(n * test_fraction)` rows,
/// keeping at least one row on each side when `n >= 2`.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut n_test = (n as f64 * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    if n >= 2 {
        n_test = n_test.clamp(1, n - 1);
    } else {
        n_test = 0;
    }

    let train = indices.split_off(n_test);
    Split {
        train,
        test: indices,
    }
}

/// Fraction of positions where prediction and truth agree; 0 for empty input.
pub fn accuracy(truth: &[u8], predicted: &[u8]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    hits as f64 / truth.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaler_centers_and_scales() {
        let rows = vec![vec![1.0, 5.0], vec![3.0, 5.0]];
        let (_, scaled) = StandardScaler::fit_transform(&rows);
        assert_eq!(scaled, vec![vec![-1.0, 0.0], vec![1.0, 0.0]]);
    }

    #[test]
    fn test_split_sizes_and_disjoint() {
        let split = train_test_split(10, 0.2, 42);
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_rounds_up_and_keeps_both_sides() {
        assert_eq!(train_test_split(11, 0.2, 1).test.len(), 3);
        assert_eq!(train_test_split(2, 0.2, 1).test.len(), 1);
        assert_eq!(train_test_split(2, 0.9, 1).train.len(), 1);
        assert!(train_test_split(1, 0.2, 1).test.is_empty());
    }

    #[test]
    fn test_split_is_deterministic_for_seed() {
        assert_eq!(train_test_split(50, 0.2, 42), train_test_split(50, 0.2, 42));
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[1, 0, 1, 1], &[1, 1, 1, 0]), 0.5);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }
}
