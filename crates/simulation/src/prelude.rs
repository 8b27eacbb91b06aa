//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use pbt_simulation::prelude::*;
//! ```

// Events
pub use crate::event::{EventData, EventLog, TradeEvent, TradeEventType};

// Indicators
pub use crate::indicators::{Crossover, CrossoverSnapshot, moving_average, trailing_average};

// Position tracking
pub use crate::position_tracker::{ClosedTrade, PositionTracker, StrategyState};

// Strategies
pub use crate::strategies::{BacktestStrategy, MovingAverageCrossover, StrategyRun};
