//! Seeded k-means with k-means++ initialisation.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::ModelError;

const MAX_ITER: usize = 300;

#[derive(Debug, Clone)]
pub struct KMeans {
    pub k: usize,
    pub n_init: usize,
    pub seed: u64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            k: 3,
            n_init: 10,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub inertia: f64,
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            ..Self::default()
        }
    }

    /// Runs `n_init` seeded restarts and keeps the lowest-inertia result.
    /// `k` is clamped to the number of points.
    pub fn fit(&self, points: &[Vec<f64>]) -> Result<Clustering, ModelError> {
        if points.is_empty() {
            return Err(ModelError::NoPoints);
        }
        let k = self.k.clamp(1, points.len());
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut best: Option<Clustering> = None;
        for _ in 0..self.n_init.max(1) {
            let run = lloyd(points, init_plus_plus(points, k, &mut rng));
            if best.as_ref().is_none_or(|b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }

        best.ok_or(ModelError::NoPoints)
    }
}

fn sq_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, sq_dist(point, c)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

fn init_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = vec![points[rng.random_range(0..points.len())].clone()];

    while centroids.len() < k {
        let weights: Vec<f64> = points.iter().map(|p| nearest(p, &centroids).1).collect();
        let total: f64 = weights.iter().sum();

        // All remaining points coincide with a centroid.
        if total <= 0.0 {
            centroids.push(points[rng.random_range(0..points.len())].clone());
            continue;
        }

        let mut target = rng.random::<f64>() * total;
        let mut chosen = points.len() - 1;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                chosen = i;
                break;
            }
            target -= w;
        }
        centroids.push(points[chosen].clone());
    }

    centroids
}

fn lloyd(points: &[Vec<f64>], mut centroids: Vec<Vec<f64>>) -> Clustering {
    let dims = points[0].len();
    let mut labels = vec![usize::MAX; points.len()];

    for _ in 0..MAX_ITER {
        let mut changed = false;
        for (label, point) in labels.iter_mut().zip(points) {
            let (nearest_id, _) = nearest(point, &centroids);
            if *label != nearest_id {
                *label = nearest_id;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![vec![0.0; dims]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (label, point) in labels.iter().zip(points) {
            counts[*label] += 1;
            for (s, v) in sums[*label].iter_mut().zip(point) {
                *s += v;
            }
        }
        for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
            // Empty clusters keep their previous centre.
            if count > 0 {
                *centroid = sum.into_iter().map(|s| s / count as f64).collect();
            }
        }
    }

    let inertia = labels
        .iter()
        .zip(points)
        .map(|(l, p)| sq_dist(p, &centroids[*l]))
        .sum();

    Clustering {
        labels,
        centroids,
        inertia,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        let mut points = Vec::new();
        for centre in [[0.0, 0.0], [10.0, 10.0], [-10.0, 10.0]] {
            for d in [-0.5, 0.0, 0.5] {
                points.push(vec![centre[0] + d, centre[1] - d]);
            }
        }
        points
    }

    #[test]
    fn test_separates_three_blobs() {
        let result = KMeans::default().fit(&blobs()).unwrap();
        for chunk in result.labels.chunks(3) {
            assert!(chunk.iter().all(|l| *l == chunk[0]));
        }
        let mut distinct = result.labels.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 3);
        assert!(result.inertia < 5.0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let a = KMeans::new(3, 7).fit(&blobs()).unwrap();
        let b = KMeans::new(3, 7).fit(&blobs()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_k_clamped_to_point_count() {
        let points = vec![vec![1.0], vec![2.0]];
        let result = KMeans::new(5, 1).fit(&points).unwrap();
        assert_eq!(result.centroids.len(), 2);
        assert_eq!(result.inertia, 0.0);
    }

    #[test]
    fn test_empty_input_errors() {
        assert_eq!(KMeans::default().fit(&[]).unwrap_err(), ModelError::NoPoints);
    }
}
