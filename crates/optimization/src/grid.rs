//! Parameter grid expansion.
//!
//! Expands candidate stop-loss and take-profit lists into the cross product of
//! strategy configurations. Window lengths are fixed for the whole grid.

use pbt_domain::value_objects::StrategyConfig;
use rust_decimal::Decimal;

/// Cross product of stop-loss and take-profit candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterGrid {
    /// Short moving-average window shared by every configuration.
    pub short_window: usize,
    /// Long moving-average window shared by every configuration.
    pub long_window: usize,
    /// Stop-loss candidates, in the order given.
    pub stop_losses: Vec<Decimal>,
    /// Take-profit candidates, in the order given.
    pub take_profits: Vec<Decimal>,
}

impl ParameterGrid {
    /// Creates an empty grid with fixed windows.
    #[must_use]
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
            stop_losses: Vec::new(),
            take_profits: Vec::new(),
        }
    }

    /// Sets the stop-loss candidates.
    #[must_use]
    pub fn with_stop_losses(mut self, values: impl Into<Vec<Decimal>>) -> Self {
        self.stop_losses = values.into();
        self
    }

    /// Sets the take-profit candidates.
    #[must_use]
    pub fn with_take_profits(mut self, values: impl Into<Vec<Decimal>>) -> Self {
        self.take_profits = values.into();
        self
    }

    /// Number of configurations the grid expands to.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stop_losses.len() * self.take_profits.len()
    }

    /// Whether the grid expands to nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expands the grid, stop-loss major.
    ///
    /// Duplicated candidates produce duplicated configurations. Nothing is
    /// validated here; invalid combinations surface as per-run failures.
    #[must_use]
    pub fn build(&self) -> Vec<StrategyConfig> {
        let mut configs = Vec::with_capacity(self.len());
        for &stop_loss in &self.stop_losses {
            for &take_profit in &self.take_profits {
                configs.push(StrategyConfig::new(
                    self.short_window,
                    self.long_window,
                    stop_loss,
                    take_profit,
                ));
            }
        }
        configs
    }
}
