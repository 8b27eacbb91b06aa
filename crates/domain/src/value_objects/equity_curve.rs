use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Account balance sampled by calendar date.
///
/// Samples are keyed by date, so several samples within one day keep only the
/// last one. Iteration is in date order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityCurve {
    points: BTreeMap<NaiveDate, Decimal>,
}

impl EquityCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `balance` for `date`, replacing any earlier sample that day.
    pub fn record(&mut self, date: NaiveDate, balance: Decimal) {
        self.points.insert(date, balance);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<Decimal> {
        self.points.get(date).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates `(date, balance)` pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Decimal)> + '_ {
        self.points.iter().map(|(date, balance)| (*date, *balance))
    }
}
