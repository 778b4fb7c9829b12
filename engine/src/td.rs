//! Top-down refinement: descend the BU hierarchy from its topmost
//! representative set, at each level cross-producting the members behind
//! the current topP pairs to discover long-range neighbor candidates and
//! seed the next level's topP set.

use std::num::NonZeroUsize;

use parking_lot::Mutex;
use rayon::prelude::*;
use vector::{BoundedMinHeap, NeighborHeapTable, NeighborPair, VectorStore};

use crate::bu::BuHierarchy;
use crate::error::Error;

#[derive(Debug, Clone)]
pub struct TdConfig {
    /// Per-worker topP budget (the spec's `P`).
    pub top_p: usize,
    /// Worker count (the spec's `W`); the live topP set is sized `W * P`,
    /// matching the global `W`x`P` buffer of §3/§4.7 rather than a single
    /// worker's slot.
    pub num_workers: usize,
}

type RepPair = (u32, u32, f32);

/// Run TD refinement over a completed BU hierarchy, updating `heaps` with
/// every candidate pair discovered along the way.
#[tracing::instrument(skip_all)]
pub fn refine(
    store: &VectorStore,
    heaps: &NeighborHeapTable,
    hierarchy: &BuHierarchy,
    config: &TdConfig,
) -> Result<(), Error> {
    let p = config.top_p;
    if p == 0 {
        return Err(Error::Domain("top_p must be positive".to_string()));
    }
    let total_p = config.num_workers.max(1) * p;

    if hierarchy.final_representatives.len() < 2 {
        return Ok(());
    }

    let mut topp = initial_top_p(store, &hierarchy.final_representatives, total_p);

    for level in hierarchy.levels.iter().rev() {
        if topp.is_empty() {
            break;
        }

        let mut members = level.members.clone();
        let gathered: Vec<(Vec<u32>, Vec<u32>)> = topp
            .iter()
            .map(|&(from_rep, to_rep, _)| {
                let from_cands = members.remove(&from_rep).unwrap_or_default();
                let to_cands = members.remove(&to_rep).unwrap_or_default();
                (from_cands, to_cands)
            })
            .collect();

        let next_heap: Mutex<BoundedMinHeap<NeighborPair>> =
            Mutex::new(BoundedMinHeap::new(NonZeroUsize::new(total_p).unwrap()));

        // Seed the next round from the leftover representatives' (those not
        // chosen as this round's topP) already-discovered neighbor entries,
        // before folding in whatever the cross-product scans below find.
        {
            let mut heap = next_heap.lock();
            for &rep in members.keys() {
                for pair in heaps.snapshot(rep) {
                    heap.push(pair);
                }
            }
        }

        gathered.par_iter().for_each(|(from_cands, to_cands)| {
            let mut local = scan_pairs(store, heaps, from_cands, from_cands);
            local.extend(scan_pairs(store, heaps, from_cands, to_cands));
            local.extend(scan_pairs(store, heaps, to_cands, to_cands));

            let mut heap = next_heap.lock();
            for pair in local {
                heap.push(pair);
            }
        });

        topp = next_heap
            .into_inner()
            .drain()
            .into_iter()
            .map(|pair| (pair.from_id, pair.to_id, pair.distance))
            .collect();
    }

    Ok(())
}

/// Three all-pairs scans over one topP pair's candidate lists (from x from,
/// from x to, to x to), offering every discovered pair symmetrically into
/// `heaps` and returning it so the caller can also feed it to the next
/// level's topP seed.
fn scan_pairs(store: &VectorStore, heaps: &NeighborHeapTable, a: &[u32], b: &[u32]) -> Vec<NeighborPair> {
    let same = std::ptr::eq(a, b);
    let mut local = Vec::new();
    for (i, &u) in a.iter().enumerate() {
        let start = if same { i + 1 } else { 0 };
        for &v in &b[start.min(b.len())..] {
            if u == v {
                continue;
            }
            let d = store.distance(u, v);
            heaps.offer(NeighborPair::new(u, v, d));
            heaps.offer(NeighborPair::new(v, u, d));
            local.push(NeighborPair::new(u, v, d));
        }
    }
    local
}

/// The weighted cross-product over the last-level representative set
/// (§4.7 steps 1-2), collapsed to: compute every pairwise distance and keep
/// the `total_p` smallest (`total_p` is the full `W * P` budget, not one
/// worker's share of it).
fn initial_top_p(store: &VectorStore, reps: &[u32], total_p: usize) -> Vec<RepPair> {
    let mut heap: BoundedMinHeap<NeighborPair> =
        BoundedMinHeap::new(NonZeroUsize::new(total_p).unwrap());
    let n = reps.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let d = store.distance(reps[i], reps[j]);
            heap.push(NeighborPair::new(reps[i], reps[j], d));
        }
    }
    heap.drain()
        .into_iter()
        .map(|pair| (pair.from_id, pair.to_id, pair.distance))
        .collect()
}
