use thiserror::Error;

/// Errors raised while constructing or validating domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A strategy configuration cannot be run.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Observations are not strictly increasing in time.
    #[error("price series is not strictly increasing at index {index}")]
    UnorderedSeries {
        /// Index of the first observation that is not after its predecessor.
        index: usize,
    },
}
