use thiserror::Error;

/// Errors raised by the clustering/BU/TD algorithms and the driver that
/// assembles them. Configuration and I/O errors belong to the binaries and
/// the `utils` codec respectively; everything here is either a domain
/// violation (bad input shape for the chosen strategy) or an internal
/// invariant the algorithm itself is supposed to maintain.
#[derive(Debug, Error)]
pub enum Error {
    #[error("internal invariant violated: {0}")]
    Internal(String),

    #[error("{0}")]
    Domain(String),

    #[error(transparent)]
    Vector(#[from] vector::Error),
}
