//! Backtest strategies.
//!
//! A strategy replays a full price series once and reports an equity curve
//! and a result summary. Implementations are pure functions of their
//! configuration and the series, so many can run side by side against one
//! shared series.

mod ma_crossover;

pub use ma_crossover::{MovingAverageCrossover, position_size};

use crate::event::TradeEvent;
use pbt_domain::entities::price_series::PriceSeries;
use pbt_domain::error::DomainError;
use pbt_domain::value_objects::{BacktestResult, EquityCurve, StrategyConfig};

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyRun {
    /// Balance sampled by date.
    pub equity_curve: EquityCurve,
    /// Performance summary.
    pub result: BacktestResult,
    /// Entries and exits in the order they happened.
    pub trades: Vec<TradeEvent>,
}

/// A strategy that can be backtested over a price series.
pub trait BacktestStrategy {
    /// Human readable strategy name.
    fn name(&self) -> &'static str;

    /// Parameters this instance runs with.
    fn config(&self) -> &StrategyConfig;

    /// Checks that the strategy can run over `series`.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidConfiguration`] if the parameters are
    /// malformed or the series is too short for them.
    fn validate(&self, series: &PriceSeries) -> Result<(), DomainError> {
        self.config().validate_for_series(series.len())
    }

    /// Replays `series` once.
    ///
    /// Must not panic on short or empty series; a run with nothing to trade
    /// reports zero trades and the initial balance.
    fn execute(&self, series: &PriceSeries) -> StrategyRun;
}
