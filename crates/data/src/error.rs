use pbt_domain::error::DomainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reading price files or writing result files.
#[derive(Debug, Error)]
pub enum DataError {
    /// A file could not be opened or created.
    #[error("cannot access {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The delimited reader or writer failed.
    #[error("delimited file error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    /// A field could not be parsed.
    #[error("line {line}: invalid {column} value '{value}'")]
    InvalidField {
        /// 1-based line number in the file.
        line: u64,
        /// Column name.
        column: &'static str,
        /// Offending text.
        value: String,
    },

    /// The parsed observations do not form a valid series.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
