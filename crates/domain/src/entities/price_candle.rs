use crate::value_objects::price::Price;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One OHLC observation for a sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCandle {
    pub timestamp: DateTime<Utc>,

    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
}

impl PriceCandle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Calendar date of the observation (UTC).
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}
