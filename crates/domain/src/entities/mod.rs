pub mod position;
pub mod price_candle;
pub mod price_series;

// Re-export for easier access
pub use position::Position;
pub use price_candle::PriceCandle;
pub use price_series::PriceSeries;
