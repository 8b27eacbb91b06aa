pub mod backtest_result;
pub mod equity_curve;
pub mod price;
pub mod strategy_config;

pub use backtest_result::BacktestResult;
pub use equity_curve::EquityCurve;
pub use price::Price;
pub use strategy_config::StrategyConfig;
