use thiserror::Error;

/// Errors shared by both evaluator collaborators: config mistakes and
/// everything their shared codec/vector dependencies can raise.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Utils(#[from] utils::Error),

    #[error(transparent)]
    Vector(#[from] vector::Error),
}
