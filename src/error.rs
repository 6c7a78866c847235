use crate::config::ConfigError;
use crate::domain::{RuleError, UnknownAlgorithm};
use crate::format::FormatError;

/// Crate-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Algorithm(#[from] UnknownAlgorithm),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Evaluation was cancelled")]
    Cancelled,
    #[error("Evaluation worker stopped without producing a result")]
    WorkerDisconnected,
    #[error("Failed to start evaluation thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
