use crate::defaults::INITIAL_BALANCE;
use crate::value_objects::strategy_config::StrategyConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Performance summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    /// Sum of realized profit and loss over all closed trades.
    pub total_profit: Decimal,
    /// Winning trades over total trades; zero when nothing traded.
    pub win_rate: Decimal,
    pub trade_count: u32,
    pub winning_trade_count: u32,
    pub final_balance: Decimal,
    /// Return on [`INITIAL_BALANCE`] in percent.
    pub percentage_return: Decimal,
}

impl BacktestResult {
    /// Builds the summary, deriving win rate and percentage return.
    pub fn new(
        config: &StrategyConfig,
        total_profit: Decimal,
        trade_count: u32,
        winning_trade_count: u32,
        final_balance: Decimal,
    ) -> Self {
        let win_rate = if trade_count > 0 {
            Decimal::from(winning_trade_count) / Decimal::from(trade_count)
        } else {
            Decimal::ZERO
        };
        let percentage_return =
            (final_balance - INITIAL_BALANCE) / INITIAL_BALANCE * Decimal::ONE_HUNDRED;

        Self {
            stop_loss: config.stop_loss,
            take_profit: config.take_profit,
            total_profit,
            win_rate,
            trade_count,
            winning_trade_count,
            final_balance,
            percentage_return,
        }
    }

    /// Summary of a run that never traded.
    pub fn untraded(config: &StrategyConfig) -> Self {
        Self::new(config, Decimal::ZERO, 0, 0, INITIAL_BALANCE)
    }
}
