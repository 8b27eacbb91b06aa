//! Grid search over strategy parameters.
//!
//! This crate expands parameter candidates into strategy configurations,
//! runs them concurrently against one shared price series, and ranks the
//! outcomes:
//! - Parameter grid generation
//! - Task-per-run orchestration with per-run error isolation
//! - Objective functions for picking the best run

/// Error types.
pub mod error;
/// Parameter grid generation.
pub mod grid;
/// Objective functions.
pub mod objective;
/// Concurrent batch execution.
pub mod orchestrator;

pub use error::RunError;
pub use grid::ParameterGrid;
pub use objective::{
    MaximizeProfit, MaximizeReturn, MaximizeWinRate, ObjectiveFunction, best_outcome,
};
pub use orchestrator::{GridRunner, RunId, RunOutcome};
