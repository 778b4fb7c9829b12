use rayon::ThreadPoolBuilder;
use std::sync::Once;

static INIT_THREADPOOL_ONCE: Once = Once::new();

/// Resolve the worker count: `NUM_CORES` env var if set and parses to a
/// positive integer, otherwise `std::thread::available_parallelism()`.
/// This single count feeds both the global `rayon` pool and the explicit
/// fork-join worker count used by the BU/TD phases, so every parallel stage
/// of a construction run agrees on how many workers exist.
pub fn resolve_worker_count() -> usize {
    std::env::var("NUM_CORES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
}

/// Initialize the global rayon threadpool with the given worker count.
/// Idempotent: only the first call in a process takes effect, matching the
/// teacher's pattern of an `Once`-guarded global pool build.
pub fn init_threadpool(num_threads: usize) {
    INIT_THREADPOOL_ONCE.call_once(|| {
        ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .expect("cannot build global rayon threadpool");
    });
}

/// Chunk size to use for an iterable input so it divides evenly across all
/// available rayon threads.
pub fn chunk_size(input_length: usize) -> usize {
    let num_threads = rayon::current_num_threads();
    let minimum_factor = std::cmp::min(input_length, num_threads);
    input_length.div_ceil(minimum_factor)
}

/// Split `size` items into `parts` contiguous chunks as evenly as possible:
/// the first `size % parts` chunks get `size / parts + 1` items, the rest
/// get `size / parts`. Returns `(start, len)` for each chunk in order.
pub fn partition(size: usize, parts: usize) -> Vec<(usize, usize)> {
    if parts == 0 {
        return Vec::new();
    }
    let base = size / parts;
    let remainder = size % parts;

    let mut out = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let len = if i < remainder { base + 1 } else { base };
        out.push((start, len));
        start += len;
    }
    out
}
