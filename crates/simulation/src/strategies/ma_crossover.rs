//! Moving-average crossover strategy.
//!
//! Goes long when the short average crosses above the long one and short when
//! it crosses below. An open position is closed on a stop loss, a take profit
//! or a crossover against it, checked in that order.

use super::{BacktestStrategy, StrategyRun};
use crate::indicators::{Crossover, CrossoverSnapshot};
use crate::position_tracker::PositionTracker;
use pbt_domain::defaults::{INITIAL_BALANCE, POSITION_SIZE_FRACTION};
use pbt_domain::entities::position::Position;
use pbt_domain::entities::price_series::PriceSeries;
use pbt_domain::enums::{ExitReason, PositionSide};
use pbt_domain::value_objects::price::Price;
use pbt_domain::value_objects::{BacktestResult, EquityCurve, StrategyConfig};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive as _;
use tracing::debug;

/// Moving-average crossover strategy with fixed stop-loss and take-profit.
#[derive(Debug, Clone)]
pub struct MovingAverageCrossover {
    /// Windows and risk parameters.
    pub config: StrategyConfig,
}

impl MovingAverageCrossover {
    /// Creates a new crossover strategy.
    #[must_use]
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    /// Decides whether `position` should be closed at `price`.
    fn exit_reason(
        &self,
        position: &Position,
        price: Price,
        signal: Crossover,
    ) -> Option<ExitReason> {
        let change_pct = position.signed_change_pct(price);

        if change_pct <= -self.config.stop_loss {
            return Some(ExitReason::StopLoss);
        }
        if change_pct >= self.config.take_profit {
            return Some(ExitReason::TakeProfit);
        }
        match (position.side, signal) {
            (PositionSide::Long, Crossover::Downward)
            | (PositionSide::Short, Crossover::Upward) => Some(ExitReason::Crossover),
            _ => None,
        }
    }
}

/// Whole shares bought with the sizing fraction of `balance` at `price`.
///
/// Zero when the price is zero or the balance is not positive.
#[must_use]
pub fn position_size(balance: Decimal, price: Price) -> u64 {
    (balance * POSITION_SIZE_FRACTION)
        .checked_div(price.value)
        .and_then(|shares| shares.trunc().to_u64())
        .unwrap_or(0)
}

impl BacktestStrategy for MovingAverageCrossover {
    fn name(&self) -> &'static str {
        "Moving Average Crossover"
    }

    fn config(&self) -> &StrategyConfig {
        &self.config
    }

    fn execute(&self, series: &PriceSeries) -> StrategyRun {
        let closes = series.closes();
        let mut tracker = PositionTracker::new(INITIAL_BALANCE);
        let mut equity_curve = EquityCurve::new();

        // The previous-step averages need one observation before the long window.
        let first_step = self.config.long_window.saturating_add(1);

        for step in first_step..series.len() {
            let candle = &series[step];
            let Some(averages) = CrossoverSnapshot::at(
                &closes,
                step,
                self.config.short_window,
                self.config.long_window,
            ) else {
                continue;
            };
            let signal = averages.signal();

            if let Some(position) = tracker.position().copied() {
                if let Some(reason) = self.exit_reason(&position, candle.close, signal) {
                    tracker.close(step, candle.timestamp, candle.close, reason);
                    // Exit days are not sampled into the equity curve.
                    continue;
                }
            } else {
                let side = match signal {
                    Crossover::Upward => Some(PositionSide::Long),
                    Crossover::Downward => Some(PositionSide::Short),
                    Crossover::None => None,
                };
                if let Some(side) = side {
                    let shares = position_size(tracker.balance(), candle.close);
                    tracker.open(step, candle.timestamp, side, candle.close, shares);
                }
            }

            equity_curve.record(candle.date(), tracker.balance());
        }

        let result = BacktestResult::new(
            &self.config,
            tracker.total_profit(),
            tracker.trade_count(),
            tracker.winning_trade_count(),
            tracker.balance(),
        );
        debug!(
            stop_loss = %self.config.stop_loss,
            take_profit = %self.config.take_profit,
            trades = result.trade_count,
            final_balance = %result.final_balance,
            "run complete"
        );

        StrategyRun {
            equity_curve,
            result,
            trades: tracker.into_events(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventData, TradeEventType};
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use pbt_domain::entities::price_candle::PriceCandle;
    use rust_decimal_macros::dec;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_704_067_200, 0).unwrap()
    }

    fn daily_series(closes: &[Decimal]) -> PriceSeries {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                let p = Price::new(*close);
                PriceCandle::new(start() + Duration::days(i as i64), p, p, p, p)
            })
            .collect();
        PriceSeries::new(candles).unwrap()
    }

    fn strategy() -> MovingAverageCrossover {
        MovingAverageCrossover::new(StrategyConfig::new(2, 4, dec!(0.05), dec!(0.10)))
    }

    fn day(offset: i64) -> NaiveDate {
        (start() + Duration::days(offset)).date_naive()
    }

    #[test]
    fn test_rising_then_falling_completes_one_long_trade() {
        let series = daily_series(&[
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(101),
            dec!(102),
            dec!(101),
            dec!(100),
            dec!(99),
        ]);

        let run = strategy().execute(&series);

        // Long entry at 102 with trunc(2000 / 102) = 19 shares, exit at 99.
        assert_eq!(run.result.trade_count, 1);
        assert_eq!(run.result.winning_trade_count, 0);
        assert_eq!(run.result.win_rate, Decimal::ZERO);
        assert_eq!(run.result.total_profit, dec!(-57));
        assert_eq!(run.result.final_balance, dec!(9943));
        assert_eq!(run.result.percentage_return, dec!(-0.57));

        assert_eq!(run.trades.len(), 2);
        assert_eq!(
            run.trades[0].data,
            EventData::PositionOpened {
                side: PositionSide::Long,
                shares: 19
            }
        );
        assert_eq!(run.trades[0].step, 6);
        assert_eq!(run.trades[1].step, 9);
        assert_eq!(run.trades[1].exit_reason(), Some(ExitReason::Crossover));
    }

    #[test]
    fn test_exit_day_is_not_recorded() {
        let series = daily_series(&[
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(101),
            dec!(102),
            dec!(101),
            dec!(100),
            dec!(99),
        ]);

        let run = strategy().execute(&series);

        assert_eq!(run.equity_curve.len(), 4);
        for offset in 5..=8 {
            assert_eq!(run.equity_curve.get(&day(offset)), Some(dec!(10000)));
        }
        assert_eq!(run.equity_curve.get(&day(9)), None);
    }

    #[test]
    fn test_falling_then_rising_completes_one_short_trade() {
        let series = daily_series(&[
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(99),
            dec!(98),
            dec!(99),
            dec!(100),
            dec!(101),
        ]);

        let run = strategy().execute(&series);

        // Short entry at 98 with trunc(2000 / 98) = 20 shares, exit at 101.
        assert_eq!(run.result.trade_count, 1);
        assert_eq!(run.result.total_profit, dec!(-60));
        assert_eq!(run.result.final_balance, dec!(9940));
        assert_eq!(
            run.trades[0].data,
            EventData::PositionOpened {
                side: PositionSide::Short,
                shares: 20
            }
        );
        assert_eq!(run.trades[1].exit_reason(), Some(ExitReason::Crossover));
    }

    #[test]
    fn test_take_profit_exit() {
        let series = daily_series(&[
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(101),
            dec!(102),
            dec!(115),
        ]);

        let run = strategy().execute(&series);

        assert_eq!(run.result.trade_count, 1);
        assert_eq!(run.result.winning_trade_count, 1);
        assert_eq!(run.result.win_rate, Decimal::ONE);
        assert_eq!(run.result.total_profit, dec!(247));
        assert_eq!(run.result.final_balance, dec!(10247));
        assert_eq!(run.trades[1].exit_reason(), Some(ExitReason::TakeProfit));
    }

    #[test]
    fn test_stop_loss_exit() {
        let series = daily_series(&[
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(101),
            dec!(102),
            dec!(96),
        ]);

        let run = strategy().execute(&series);

        assert_eq!(run.result.trade_count, 1);
        assert_eq!(run.result.total_profit, dec!(-114));
        assert_eq!(run.result.final_balance, dec!(9886));
        assert_eq!(run.trades[1].exit_reason(), Some(ExitReason::StopLoss));
    }

    #[test]
    fn test_stop_loss_wins_over_crossover() {
        let series = daily_series(&[
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(101),
            dec!(102),
            dec!(98),
            dec!(96),
        ]);
        let closes = series.closes();

        // Step 8 also carries a downward crossover (100 < 100.25).
        let snapshot = CrossoverSnapshot::at(&closes, 8, 2, 4).unwrap();
        assert_eq!(snapshot.signal(), Crossover::Downward);

        let run = strategy().execute(&series);

        assert_eq!(run.result.trade_count, 1);
        assert_eq!(run.result.total_profit, dec!(-114));
        assert_eq!(run.trades[1].step, 8);
        assert_eq!(run.trades[1].exit_reason(), Some(ExitReason::StopLoss));
    }

    #[test]
    fn test_take_profit_wins_over_crossover() {
        let series = daily_series(&[
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(101),
            dec!(102),
            dec!(98),
            dec!(113),
        ]);
        let closes = series.closes();

        let snapshot = CrossoverSnapshot::at(&closes, 8, 2, 4).unwrap();
        assert_eq!(snapshot.signal(), Crossover::Downward);

        let run = strategy().execute(&series);

        assert_eq!(run.result.trade_count, 1);
        assert_eq!(run.result.winning_trade_count, 1);
        assert_eq!(run.result.total_profit, dec!(209));
        assert_eq!(run.result.final_balance, dec!(10209));
        assert_eq!(run.trades[1].exit_reason(), Some(ExitReason::TakeProfit));
    }

    #[test]
    fn test_short_stop_loss_exit() {
        let series = daily_series(&[
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(99),
            dec!(98),
            dec!(104),
        ]);

        let run = strategy().execute(&series);

        // Short entry at 98 with 20 shares; a rise to 104 is a 6.1% adverse move.
        assert_eq!(run.result.trade_count, 1);
        assert_eq!(run.result.winning_trade_count, 0);
        assert_eq!(run.result.total_profit, dec!(-120));
        assert_eq!(run.result.final_balance, dec!(9880));
        assert_eq!(run.trades[1].exit_reason(), Some(ExitReason::StopLoss));
    }

    #[test]
    fn test_short_take_profit_exit() {
        let series = daily_series(&[
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(99),
            dec!(98),
            dec!(88),
        ]);

        let run = strategy().execute(&series);

        assert_eq!(run.result.trade_count, 1);
        assert_eq!(run.result.winning_trade_count, 1);
        assert_eq!(run.result.total_profit, dec!(200));
        assert_eq!(run.result.final_balance, dec!(10200));
        assert_eq!(run.trades[1].exit_reason(), Some(ExitReason::TakeProfit));
    }

    #[test]
    fn test_open_position_at_end_is_not_liquidated() {
        let series = daily_series(&[
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(100),
            dec!(101),
            dec!(102),
            dec!(103),
        ]);

        let run = strategy().execute(&series);

        assert_eq!(run.result.trade_count, 0);
        assert_eq!(run.result.final_balance, dec!(10000));
        assert_eq!(run.trades.len(), 1);
        assert_eq!(run.trades[0].event_type, TradeEventType::PositionOpened);
    }

    #[test]
    fn test_empty_and_short_series_do_not_trade() {
        let empty = PriceSeries::empty();
        let run = strategy().execute(&empty);
        assert_eq!(run.result.trade_count, 0);
        assert_eq!(run.result.final_balance, INITIAL_BALANCE);
        assert_eq!(run.result.win_rate, Decimal::ZERO);
        assert!(run.equity_curve.is_empty());

        let short = daily_series(&[dec!(100), dec!(101), dec!(102)]);
        let run = strategy().execute(&short);
        assert_eq!(run.result.trade_count, 0);
        assert_eq!(run.result.final_balance, INITIAL_BALANCE);
        assert!(run.trades.is_empty());
    }

    #[test]
    fn test_malformed_windows_do_not_panic() {
        let series = daily_series(&[dec!(100); 10]);
        let zero = MovingAverageCrossover::new(StrategyConfig::new(0, 4, dec!(0.05), dec!(0.10)));
        assert_eq!(zero.execute(&series).result.trade_count, 0);

        let huge = MovingAverageCrossover::new(StrategyConfig::new(
            2,
            usize::MAX,
            dec!(0.05),
            dec!(0.10),
        ));
        assert_eq!(huge.execute(&series).result.trade_count, 0);
    }

    #[test]
    fn test_validate_against_series() {
        let series = daily_series(&[dec!(100); 4]);
        assert!(strategy().validate(&series).is_err());

        let series = daily_series(&[dec!(100); 5]);
        assert!(strategy().validate(&series).is_ok());
    }

    #[test]
    fn test_trades_alternate_between_entry_and_exit() {
        let closes: Vec<Decimal> = (0..120)
            .map(|i| {
                let wave = Decimal::from((i % 20) as i64 - 10).abs();
                dec!(100) + wave
            })
            .collect();
        let series = daily_series(&closes);

        let run = strategy().execute(&series);

        assert!(run.result.trade_count > 0);
        for (i, event) in run.trades.iter().enumerate() {
            let expected = if i % 2 == 0 {
                TradeEventType::PositionOpened
            } else {
                TradeEventType::PositionClosed
            };
            assert_eq!(event.event_type, expected);
        }
        assert_eq!(
            run.trades
                .iter()
                .filter(|e| e.event_type == TradeEventType::PositionClosed)
                .count(),
            run.result.trade_count as usize
        );
    }

    #[test]
    fn test_percentage_return_matches_final_balance() {
        let closes: Vec<Decimal> = (0..200)
            .map(|i| dec!(100) + Decimal::from((i * 7) % 23) - Decimal::from((i * 3) % 11))
            .collect();
        let series = daily_series(&closes);

        let run = strategy().execute(&series);

        let expected = (run.result.final_balance - dec!(10000)) / dec!(10000) * dec!(100);
        assert_eq!(run.result.percentage_return, expected);
        assert_eq!(
            run.result.final_balance,
            dec!(10000) + run.result.total_profit
        );
    }

    #[test]
    fn test_position_size() {
        assert_eq!(position_size(dec!(10000), Price::new(dec!(102))), 19);
        assert_eq!(position_size(dec!(10000), Price::new(dec!(100))), 20);
        assert_eq!(position_size(dec!(10000), Price::new(Decimal::ZERO)), 0);
        assert_eq!(position_size(dec!(-50), Price::new(dec!(10))), 0);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let closes: Vec<Decimal> = (0..150)
            .map(|i| dec!(50) + Decimal::from((i * 13) % 17))
            .collect();
        let series = daily_series(&closes);

        assert_eq!(strategy().execute(&series), strategy().execute(&series));
    }
}
