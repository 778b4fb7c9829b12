use thiserror::Error;

/// I/O and validation errors surfaced while reading or writing the binary
/// dataset, k-NNG, and ground-truth-sample formats.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {path}: {source}")]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error reading/writing {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} ends mid-record: expected a multiple of {record_size} bytes, found {actual}")]
    TruncatedRecord {
        path: std::path::PathBuf,
        record_size: usize,
        actual: usize,
    },

    #[error("malformed dataset {path}: header declares {n_points} points x {dimensions} dims, expected a {expected}-byte file, found {actual}")]
    MalformedDataset {
        path: std::path::PathBuf,
        n_points: usize,
        dimensions: usize,
        expected: u64,
        actual: u64,
    },

    #[error("point {id} has {found} neighbors, expected exactly {expected}")]
    NeighborCountMismatch {
        id: u32,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Vector(#[from] vector::Error),
}
