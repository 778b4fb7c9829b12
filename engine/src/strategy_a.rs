//! Nearest-Clusters: cluster the dataset with k-means, then exhaustively
//! search each point's `m` nearest clusters for its k-NN candidates.

use rayon::prelude::*;
use vector::{NeighborHeapTable, NeighborPair, VectorStore};

use crate::error::Error;
use crate::kmeans::{k_means, nearest_m_clusters};

#[derive(Debug, Clone)]
pub struct StrategyAConfig {
    pub n_clusters: usize,
    pub n_iters: usize,
    pub nearest_clusters: usize,
}

#[tracing::instrument(skip_all)]
pub fn run(
    store: &VectorStore,
    config: &StrategyAConfig,
    heaps: &NeighborHeapTable,
    seed: u64,
) -> Result<(), Error> {
    if config.n_clusters == 0 {
        return Err(Error::Domain("n_clusters must be positive".to_string()));
    }
    if config.n_iters == 0 {
        return Err(Error::Domain("n_iters must be positive".to_string()));
    }

    let kmeans_result = k_means(store, config.n_clusters, config.n_iters, seed);
    let m = config.nearest_clusters.min(kmeans_result.centroids.len()).max(1);
    let nearest = nearest_m_clusters(store, &kmeans_result.centroids, m);

    let mut cluster_members: Vec<Vec<u32>> = vec![Vec::new(); kmeans_result.centroids.len()];
    for (p, &c) in kmeans_result.assignment.iter().enumerate() {
        cluster_members[c].push(p as u32);
    }

    (0..store.len() as u32).into_par_iter().for_each(|p| {
        for &c in &nearest[p as usize] {
            for &q in &cluster_members[c] {
                if q == p {
                    continue;
                }
                let d = store.distance(p, q);
                heaps.offer(NeighborPair::new(p, q, d));
            }
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    #[test]
    fn single_cluster_exhaustive_search_finds_every_other_point() {
        // 10 points on a line; one cluster means every point searches the
        // whole dataset, so its heap should fill with its 9 closest peers.
        let coords: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let store = VectorStore::new(coords, 1).unwrap();
        let heaps = NeighborHeapTable::new(10, NonZeroUsize::new(9).unwrap());

        let config = StrategyAConfig {
            n_clusters: 1,
            n_iters: 1,
            nearest_clusters: 1,
        };
        run(&store, &config, &heaps, 7).unwrap();

        let knng = heaps.into_knng();
        for (i, row) in knng.iter().enumerate() {
            assert_eq!(row.len(), 9);
            assert!(!row.contains(&(i as u32)));
        }
    }
}
