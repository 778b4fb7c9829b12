//! Partition-local k-medoids clustering: the summarisation step the BU
//! hierarchy repeats at every level.

use std::collections::HashMap;

use vector::VectorStore;

use crate::error::Error;

/// Index into an upper-triangular pairwise-distance array of `s` elements.
/// Requires `i < j`; callers must swap before indexing.
pub fn triu(i: usize, j: usize, s: usize) -> usize {
    debug_assert!(i < j, "triu requires i < j, got i={i} j={j}");
    i * (s - 1) - i * (i - 1) / 2 + j - i - 1
}

fn pair_distance(distances: &[f32], s: usize, a: usize, b: usize) -> f32 {
    if a == b {
        return 0.0;
    }
    let (i, j) = if a < b { (a, b) } else { (b, a) };
    distances[triu(i, j, s)]
}

/// Pairwise squared-Euclidean distances for `ids`, laid out
/// upper-triangular (length `s * (s - 1) / 2`).
pub fn pairwise_distances(store: &VectorStore, ids: &[u32]) -> Vec<f32> {
    let s = ids.len();
    let mut out = vec![0.0_f32; s.saturating_sub(1) * s / 2];
    for i in 0..s {
        for j in (i + 1)..s {
            out[triu(i, j, s)] = store.distance(ids[i], ids[j]);
        }
    }
    out
}

/// The output of one k-medoids run: the chosen medoids' global ids, and the
/// global ids each medoid represents (including itself).
pub struct MedoidClustering {
    pub representatives: Vec<u32>,
    pub members: HashMap<u32, Vec<u32>>,
}

/// Cluster `ids` (with precomputed pairwise `distances`) into `n_clusters`
/// medoid-centered groups, per the incremental running-sum procedure: the
/// first `n_clusters` members seed one cluster each, then every later
/// member joins its nearest current medoid and that cluster's medoid is
/// recomputed from the running per-member distance sums.
pub fn k_medoids(
    ids: &[u32],
    distances: &[f32],
    n_clusters: usize,
) -> Result<MedoidClustering, Error> {
    let s = ids.len();
    if n_clusters == 0 {
        return Err(Error::Internal("n_clusters must be positive".to_string()));
    }
    if s < n_clusters {
        return Err(Error::Internal(format!(
            "partition of size {s} cannot produce {n_clusters} medoids"
        )));
    }

    let mut members: Vec<Vec<usize>> = (0..n_clusters).map(|c| vec![c]).collect();
    let mut medoid_local: Vec<usize> = (0..n_clusters).collect();
    let mut medoid_distances: Vec<HashMap<usize, f32>> =
        (0..n_clusters).map(|_| HashMap::new()).collect();
    for (c, map) in medoid_distances.iter_mut().enumerate() {
        map.insert(c, 0.0);
    }

    for p in n_clusters..s {
        let mut best_cluster = 0usize;
        let mut best_distance = f32::INFINITY;
        for c in 0..n_clusters {
            let d = pair_distance(distances, s, medoid_local[c], p);
            if d < best_distance {
                best_distance = d;
                best_cluster = c;
            }
        }

        let mut new_member_sum = 0.0_f32;
        for &m in &members[best_cluster] {
            let d = pair_distance(distances, s, m, p);
            *medoid_distances[best_cluster].get_mut(&m).expect("existing member tracked") += d;
            new_member_sum += d;
        }
        medoid_distances[best_cluster].insert(p, new_member_sum);
        members[best_cluster].push(p);

        let new_medoid = *medoid_distances[best_cluster]
            .iter()
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap().then_with(|| a.0.cmp(b.0)))
            .map(|(id, _)| id)
            .expect("cluster always has at least one member");
        medoid_local[best_cluster] = new_medoid;
    }

    let mut representatives = Vec::with_capacity(n_clusters);
    let mut out_members = HashMap::with_capacity(n_clusters);
    for (c, local_medoid) in medoid_local.into_iter().enumerate() {
        let rep_global = ids[local_medoid];
        representatives.push(rep_global);
        let member_globals = members[c].iter().map(|&m| ids[m]).collect();
        out_members.insert(rep_global, member_globals);
    }

    Ok(MedoidClustering {
        representatives,
        members: out_members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn triu_matches_known_layout() {
        // s = 4: pairs (0,1) (0,2) (0,3) (1,2) (1,3) (2,3) at indices 0..5
        assert_eq!(triu(0, 1, 4), 0);
        assert_eq!(triu(0, 3, 4), 2);
        assert_eq!(triu(2, 3, 4), 5);
    }

    #[test]
    fn rejects_fewer_members_than_clusters() {
        let ids = vec![1, 2];
        let distances = pairwise_distances_raw(&[0.0, 1.0]);
        let err = k_medoids(&ids, &distances, 3).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn every_member_is_assigned_exactly_once() {
        // 6 points on a line; cluster into 2 medoids.
        let ids: Vec<u32> = (0..6).collect();
        let coords: Vec<f32> = (0..6).map(|i| i as f32).collect();
        let distances = pairwise_distances_raw(&coords);

        let clustering = k_medoids(&ids, &distances, 2).unwrap();
        assert_eq!(clustering.representatives.len(), 2);

        let mut seen: Vec<u32> = clustering.members.values().flatten().copied().collect();
        seen.sort();
        assert_eq!(seen, ids);
    }

    fn pairwise_distances_raw(coords: &[f32]) -> Vec<f32> {
        let s = coords.len();
        let mut out = vec![0.0_f32; s.saturating_sub(1) * s / 2];
        for i in 0..s {
            for j in (i + 1)..s {
                let diff = coords[i] - coords[j];
                out[triu(i, j, s)] = diff * diff;
            }
        }
        out
    }
}
