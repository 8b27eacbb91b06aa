//! File I/O for backtests.
//!
//! - Loading price series from delimited files
//! - Writing per-run equity curves to a results file

/// Error types.
pub mod error;
/// Price file loading.
pub mod loader;
/// Result file writing.
pub mod sink;

pub use error::DataError;
pub use loader::{load_price_series, read_price_series};
pub use sink::{write_records, write_results};
