//! Brute-force exact k-NN, used only by the ground-truth generator. No
//! clustering or heuristics - every candidate is compared against every
//! other point.

use std::num::NonZeroUsize;

use rayon::prelude::*;
use vector::{BoundedMinHeap, NeighborHeap, NeighborPair, VectorStore};

/// The exact `k + 1` nearest neighbors of every id in `query_ids`
/// (including each query's self-match), farthest-first, computed in
/// parallel across queries.
pub fn exact_knn_plus_self(store: &VectorStore, query_ids: &[u32], k: usize) -> Vec<Vec<u32>> {
    let capacity = NonZeroUsize::new(k + 1).expect("k + 1 is always positive");

    query_ids
        .par_iter()
        .map(|&query| {
            let mut heap = NeighborHeap::new(u32::MAX, capacity);
            for candidate in store.ids() {
                if candidate == query {
                    continue;
                }
                let d = store.distance(query, candidate);
                heap.offer(NeighborPair::new(query, candidate, d));
            }
            // The self-match (distance 0) always fits since the heap holds
            // k + 1 entries and every non-self candidate has distance >= 0;
            // admit it explicitly rather than relying on eviction order.
            heap.offer(NeighborPair::new(query, query, 0.0));
            heap.drain_to_ids()
        })
        .collect()
}

/// Exact k-NN excluding self, used as the reusable brute-force primitive for
/// any caller that doesn't need the self-entry-filtering dance (e.g. tests).
pub fn exact_knn(store: &VectorStore, query: u32, k: usize) -> Vec<u32> {
    let mut heap: BoundedMinHeap<NeighborPair> =
        BoundedMinHeap::new(NonZeroUsize::new(k).expect("k must be positive"));
    for candidate in store.ids() {
        if candidate == query {
            continue;
        }
        let d = store.distance(query, candidate);
        heap.push(NeighborPair::new(query, candidate, d));
    }
    heap.drain().into_iter().map(|pair| pair.to_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exact_knn_on_a_line_returns_closest_points() {
        let coords: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let store = VectorStore::new(coords, 1).unwrap();
        let knn = exact_knn(&store, 5, 2);
        // drain is farthest-first; the two closest to 5 are 4 and 6, tied.
        assert_eq!(knn.len(), 2);
        assert!(knn.contains(&4));
        assert!(knn.contains(&6));
    }

    #[test]
    fn exact_knn_plus_self_includes_the_query_id() {
        let coords: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let store = VectorStore::new(coords, 1).unwrap();
        let results = exact_knn_plus_self(&store, &[5], 3);
        assert!(results[0].contains(&5));
    }
}
