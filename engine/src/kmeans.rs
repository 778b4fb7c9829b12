//! Strategy A's clustering primitive: whole-dataset k-means followed by a
//! per-point nearest-m-centroids assignment.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use vector::VectorStore;

pub struct KMeansResult {
    pub centroids: Vec<Vec<f32>>,
    pub assignment: Vec<usize>,
}

/// Cluster `store`'s points into `n_clusters` groups. Initial centroids are
/// `n_clusters` distinct points sampled uniformly at random (seeded by
/// `seed` for reproducibility); each iteration reassigns every point to its
/// nearest centroid (ties broken by lowest centroid id) and recenters,
/// stopping early if no point changed cluster.
pub fn k_means(store: &VectorStore, n_clusters: usize, n_iters: usize, seed: u64) -> KMeansResult {
    let n = store.len();
    let d = store.dimensions();
    let mut rng = StdRng::seed_from_u64(seed);

    let chosen = rand::seq::index::sample(&mut rng, n, n_clusters.min(n));
    let mut centroids: Vec<Vec<f32>> = chosen
        .into_iter()
        .map(|i| store.point(i as u32).to_vec())
        .collect();
    let mut assignment = vec![usize::MAX; n];

    for _ in 0..n_iters {
        let new_assignment: Vec<usize> = (0..n)
            .into_par_iter()
            .map(|p| nearest_centroid(store.point(p as u32), &centroids))
            .collect();

        let changed = new_assignment != assignment;
        assignment = new_assignment;
        if !changed {
            break;
        }

        let mut sums = vec![vec![0.0_f32; d]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (p, &c) in assignment.iter().enumerate() {
            counts[c] += 1;
            let point = store.point(p as u32);
            for (sum, &coord) in sums[c].iter_mut().zip(point) {
                *sum += coord;
            }
        }
        for (c, centroid) in centroids.iter_mut().enumerate() {
            if counts[c] == 0 {
                continue;
            }
            for (coord, &sum) in centroid.iter_mut().zip(&sums[c]) {
                *coord = sum / counts[c] as f32;
            }
        }
    }

    KMeansResult {
        centroids,
        assignment,
    }
}

fn nearest_centroid(point: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0usize;
    let mut best_distance = f32::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = vector::squared_euclidean_distance(point, centroid);
        if d < best_distance {
            best_distance = d;
            best = c;
        }
    }
    best
}

/// For every point, its `m` nearest centroid indices, nearest-first.
pub fn nearest_m_clusters(store: &VectorStore, centroids: &[Vec<f32>], m: usize) -> Vec<Vec<usize>> {
    (0..store.len())
        .into_par_iter()
        .map(|p| {
            let point = store.point(p as u32);
            let mut dists: Vec<(usize, f32)> = centroids
                .iter()
                .enumerate()
                .map(|(c, centroid)| (c, vector::squared_euclidean_distance(point, centroid)))
                .collect();
            dists.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)));
            dists.truncate(m);
            dists.into_iter().map(|(c, _)| c).collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_cluster_assigns_everyone_to_it() {
        let store = VectorStore::new(vec![0.0, 1.0, 2.0, 3.0], 1).unwrap();
        let result = k_means(&store, 1, 5, 42);
        assert_eq!(result.assignment, vec![0, 0, 0, 0]);
    }

    #[test]
    fn nearest_m_clusters_orders_nearest_first() {
        let store = VectorStore::new(vec![0.0, 10.0, 20.0], 1).unwrap();
        let centroids = vec![vec![0.0], vec![10.0], vec![20.0]];
        let nearest = nearest_m_clusters(&store, &centroids, 2);
        assert_eq!(nearest[0], vec![0, 1]);
        assert_eq!(nearest[2], vec![2, 1]);
    }
}
