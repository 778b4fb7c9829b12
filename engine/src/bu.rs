//! Strategy B's bottom-up hierarchy: each worker repeatedly partitions and
//! clusters its own chunk, promoting medoids to the next level, until the
//! chunk shrinks to a single partition.

use std::collections::HashMap;

use rayon::prelude::*;
use vector::{NeighborHeapTable, NeighborPair, VectorStore};

use crate::error::Error;
use crate::medoid::{self, MedoidClustering};

/// One BU level: the representative -> members mapping produced by
/// clustering every partition at that level.
#[derive(Debug, Clone, Default)]
pub struct BuLevel {
    pub members: HashMap<u32, Vec<u32>>,
}

/// A full bottom-up hierarchy, plus the final (topmost) set of
/// representative ids TD refinement starts its descent from.
#[derive(Debug, Clone, Default)]
pub struct BuHierarchy {
    pub levels: Vec<BuLevel>,
    pub final_representatives: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct StrategyBConfig {
    pub partition_size: usize,
    pub n_clusters: usize,
    pub top_p: usize,
}

/// Build one worker's hierarchy over its assigned `ids`. No cross-worker
/// communication happens here (§5: BU needs no barriers), so this can run
/// independently on any thread.
pub fn build_worker_hierarchy(
    store: &VectorStore,
    heaps: &NeighborHeapTable,
    mut ids: Vec<u32>,
    partition_size: usize,
    n_clusters: usize,
) -> Result<BuHierarchy, Error> {
    let mut levels = Vec::new();

    loop {
        if ids.len() <= partition_size {
            break;
        }

        let n_parts = ids.len().div_ceil(partition_size);
        let chunks = utils::parallel::partition(ids.len(), n_parts);

        let mut next_ids = Vec::with_capacity(n_parts * n_clusters);
        let mut level_members = HashMap::with_capacity(n_parts * n_clusters);

        for (start, len) in chunks {
            let part_ids = &ids[start..start + len];
            let distances = medoid::pairwise_distances(store, part_ids);

            bootstrap_heaps_from_partition(heaps, part_ids, &distances);

            let effective_clusters = n_clusters.min(part_ids.len());
            let MedoidClustering {
                representatives,
                members,
            } = medoid::k_medoids(part_ids, &distances, effective_clusters)?;

            next_ids.extend(representatives);
            level_members.extend(members);
        }

        let shrank = next_ids.len() < ids.len();
        levels.push(BuLevel {
            members: level_members,
        });
        ids = next_ids;
        if !shrank {
            // fixed-point guard (§4.6/§9): level size failed to decrease.
            break;
        }
    }

    Ok(BuHierarchy {
        levels,
        final_representatives: ids,
    })
}

fn bootstrap_heaps_from_partition(heaps: &NeighborHeapTable, part_ids: &[u32], distances: &[f32]) {
    let s = part_ids.len();
    for i in 0..s {
        for j in (i + 1)..s {
            let d = distances[medoid::triu(i, j, s)];
            heaps.offer_symmetric(NeighborPair::new(part_ids[i], part_ids[j], d));
        }
    }
}

/// Split the whole dataset across `num_workers` chunks (§4.3: the same
/// partitioner used within a level), build each worker's hierarchy
/// independently in parallel, then merge them depth-by-depth into one
/// hierarchy TD can descend uniformly. Merging is exact when every worker's
/// chunk shrinks at the same rate; in general workers may reach different
/// depths, in which case the shallower workers' representatives simply stop
/// contributing new levels past their own depth (see DESIGN.md).
#[tracing::instrument(skip_all)]
pub fn build_bu_hierarchy(
    store: &VectorStore,
    heaps: &NeighborHeapTable,
    config: &StrategyBConfig,
    num_workers: usize,
) -> Result<BuHierarchy, Error> {
    if config.partition_size == 0 {
        return Err(Error::Domain("partition_size must be positive".to_string()));
    }
    if config.n_clusters == 0 {
        return Err(Error::Domain("n_clusters must be positive".to_string()));
    }

    let all_ids: Vec<u32> = store.ids().collect();
    let worker_chunks = utils::parallel::partition(all_ids.len(), num_workers.max(1));

    let per_worker: Vec<BuHierarchy> = worker_chunks
        .into_par_iter()
        .map(|(start, len)| {
            let ids = all_ids[start..start + len].to_vec();
            build_worker_hierarchy(store, heaps, ids, config.partition_size, config.n_clusters)
        })
        .collect::<Result<_, _>>()?;

    let max_depth = per_worker.iter().map(|h| h.levels.len()).max().unwrap_or(0);
    let mut merged_levels = vec![BuLevel::default(); max_depth];
    for hierarchy in &per_worker {
        for (depth, level) in hierarchy.levels.iter().enumerate() {
            merged_levels[depth].members.extend(level.members.clone());
        }
    }

    let final_representatives: Vec<u32> = per_worker
        .iter()
        .flat_map(|h| h.final_representatives.iter().copied())
        .collect();

    Ok(BuHierarchy {
        levels: merged_levels,
        final_representatives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::num::NonZeroUsize;

    #[test]
    fn single_worker_shrinks_until_below_partition_size() {
        let coords: Vec<f32> = (0..40).map(|i| i as f32).collect();
        let store = VectorStore::new(coords, 1).unwrap();
        let heaps = NeighborHeapTable::new(40, NonZeroUsize::new(10).unwrap());
        let ids: Vec<u32> = (0..40).collect();

        let hierarchy = build_worker_hierarchy(&store, &heaps, ids, 10, 2).unwrap();
        assert!(!hierarchy.levels.is_empty());
        assert!(hierarchy.final_representatives.len() <= 10);
    }

    #[test]
    fn every_level_covers_its_input_set_exactly_once() {
        let coords: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let store = VectorStore::new(coords, 1).unwrap();
        let heaps = NeighborHeapTable::new(20, NonZeroUsize::new(5).unwrap());
        let ids: Vec<u32> = (0..20).collect();

        let hierarchy = build_worker_hierarchy(&store, &heaps, ids.clone(), 5, 2).unwrap();
        let first_level = &hierarchy.levels[0];
        let mut covered: Vec<u32> = first_level.members.values().flatten().copied().collect();
        covered.sort();
        assert_eq!(covered, ids);
    }
}
