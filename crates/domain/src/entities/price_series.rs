use crate::entities::price_candle::PriceCandle;
use crate::error::DomainError;
use rust_decimal::Decimal;
use std::ops::Index;

/// Time-ordered, immutable sequence of observations.
///
/// Construction checks that timestamps are strictly increasing. Gaps between
/// observations are allowed; consumers index positionally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceSeries {
    candles: Vec<PriceCandle>,
}

impl PriceSeries {
    /// Creates a series from ordered candles.
    ///
    /// # Errors
    /// Returns [`DomainError::UnorderedSeries`] at the first candle whose
    /// timestamp is not after its predecessor.
    pub fn new(candles: Vec<PriceCandle>) -> Result<Self, DomainError> {
        if let Some(index) = candles
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(DomainError::UnorderedSeries { index: index + 1 });
        }
        Ok(Self { candles })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[PriceCandle] {
        &self.candles
    }

    /// Closing prices in series order.
    pub fn closes(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.close.value).collect()
    }

    pub fn first(&self) -> Option<&PriceCandle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&PriceCandle> {
        self.candles.last()
    }
}

impl Index<usize> for PriceSeries {
    type Output = PriceCandle;

    fn index(&self, index: usize) -> &Self::Output {
        &self.candles[index]
    }
}
