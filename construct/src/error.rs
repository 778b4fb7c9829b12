use thiserror::Error;

/// The four error kinds this binary can surface, each mapped to the single
/// fatal-diagnostic-and-exit-1 path in `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Utils(#[from] utils::Error),

    #[error(transparent)]
    Engine(#[from] engine::Error),

    #[error(transparent)]
    Vector(#[from] vector::Error),
}
