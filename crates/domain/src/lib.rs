//! Core data model for the parallel backtester.
//!
//! Price observations and series, strategy configurations, open positions,
//! equity curves and per-run result summaries. Everything here is plain data
//! with validation; no I/O and no concurrency.

/// Fixed account and sizing parameters.
pub mod defaults;
/// Entities with identity over a run (candles, series, positions).
pub mod entities;
/// Shared enumerations.
pub mod enums;
/// Domain error type.
pub mod error;
/// Immutable value objects.
pub mod value_objects;

pub use error::DomainError;
