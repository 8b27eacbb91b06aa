use crate::enums::PositionSide;
use crate::value_objects::price::Price;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An open trade. Owned by a single run and never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub side: PositionSide,
    pub entry_price: Price,
    pub shares: u64,
    pub opened_at: DateTime<Utc>,
}

impl Position {
    pub fn new(
        side: PositionSide,
        entry_price: Price,
        shares: u64,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            side,
            entry_price,
            shares,
            opened_at,
        }
    }

    /// Per-share change at `price`, signed so that gains are positive.
    ///
    /// Unlike the raw price change, a short gains when the price falls.
    pub fn signed_change(&self, price: Price) -> Decimal {
        let raw = price.value - self.entry_price.value;
        match self.side {
            PositionSide::Long => raw,
            PositionSide::Short => -raw,
        }
    }

    /// [`Position::signed_change`] as a fraction of the entry price.
    pub fn signed_change_pct(&self, price: Price) -> Decimal {
        if self.entry_price.is_zero() {
            return Decimal::ZERO;
        }
        self.signed_change(price) / self.entry_price.value
    }

    /// Profit or loss of the whole position if closed at `price`.
    pub fn pnl_at(&self, price: Price) -> Decimal {
        self.signed_change(price) * Decimal::from(self.shares)
    }
}
