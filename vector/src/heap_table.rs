use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::heap::{NeighborHeap, NeighborPair};

/// One bounded neighbor heap per point, each guarded by its own lock so
/// concurrent workers can update different points' heaps without
/// contending on a single global lock.
pub struct NeighborHeapTable {
    heaps: Vec<Mutex<NeighborHeap>>,
}

impl NeighborHeapTable {
    pub fn new(len: usize, capacity: NonZeroUsize) -> Self {
        let heaps = (0..len)
            .map(|id| Mutex::new(NeighborHeap::new(id as u32, capacity)))
            .collect();
        Self { heaps }
    }

    pub fn len(&self) -> usize {
        self.heaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heaps.is_empty()
    }

    /// Offer a single directed pair into `pair.from_id`'s heap.
    pub fn offer(&self, pair: NeighborPair) -> bool {
        self.heaps[pair.from_id as usize].lock().offer(pair)
    }

    /// Offer a pair and its reverse, bootstrapping both endpoints' heaps
    /// from one computed distance.
    pub fn offer_symmetric(&self, pair: NeighborPair) {
        self.offer(pair);
        self.offer(pair.reversed());
    }

    pub fn is_full(&self, id: u32) -> bool {
        self.heaps[id as usize].lock().is_full()
    }

    /// Snapshot `id`'s currently admitted neighbor pairs without draining.
    pub fn snapshot(&self, id: u32) -> Vec<NeighborPair> {
        self.heaps[id as usize].lock().snapshot()
    }

    /// Drain every point's heap into farthest-first neighbor ids, in point
    /// id order. Consumes the table.
    pub fn into_knng(self) -> Vec<Vec<u32>> {
        self.heaps
            .into_iter()
            .map(|m| m.into_inner().drain_to_ids())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn offer_symmetric_updates_both_endpoints() {
        let table = NeighborHeapTable::new(3, NonZeroUsize::new(2).unwrap());
        table.offer_symmetric(NeighborPair::new(0, 1, 5.0));
        let knng = table.into_knng();
        assert!(knng[0].contains(&1));
        assert!(knng[1].contains(&0));
        assert!(knng[2].is_empty());
    }

    #[test]
    fn snapshot_does_not_drain() {
        let table = NeighborHeapTable::new(3, NonZeroUsize::new(2).unwrap());
        table.offer_symmetric(NeighborPair::new(0, 1, 5.0));
        let snap = table.snapshot(0);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].to_id, 1);
        // still present after the snapshot.
        assert!(!table.into_knng()[0].is_empty());
    }
}
