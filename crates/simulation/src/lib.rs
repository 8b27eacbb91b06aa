//! Strategy engine for the parallel backtester.
//!
//! This crate replays a price series under one strategy configuration:
//! - Moving-average indicators and crossover detection
//! - Position state machine (flat / long / short)
//! - Trade event log
//! - The `BacktestStrategy` capability and its moving-average crossover variant

/// Prelude module for convenient imports.
pub mod prelude;

/// Trade events.
pub mod event;
/// Moving averages and crossovers.
pub mod indicators;
/// Position state machine.
pub mod position_tracker;
/// Strategy implementations.
pub mod strategies;
