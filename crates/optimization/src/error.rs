use pbt_domain::error::DomainError;
use thiserror::Error;

/// Why a single run in a batch produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// The strategy cannot run with its parameters over this series.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The task executing the run panicked or was aborted.
    #[error("run task failed: {0}")]
    TaskFailed(String),
}

impl From<DomainError> for RunError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidConfiguration(reason) => RunError::InvalidConfiguration(reason),
            other => RunError::InvalidConfiguration(other.to_string()),
        }
    }
}
