//! Moving-average indicators and crossover detection.
//!
//! Averages are recomputed from scratch over a fixed contiguous window at
//! every step. This is O(window) per step, which is fine at the data sizes
//! this tool handles.

use rust_decimal::Decimal;

/// Arithmetic mean of `values`. Zero for an empty slice.
#[must_use]
pub fn moving_average(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = values.iter().sum();
    sum / Decimal::from(values.len())
}

/// Mean of the `window` values immediately preceding `end` (exclusive).
///
/// Returns `None` when the window is empty or does not fit before `end`.
#[must_use]
pub fn trailing_average(values: &[Decimal], end: usize, window: usize) -> Option<Decimal> {
    if window == 0 || end < window || end > values.len() {
        return None;
    }
    Some(moving_average(&values[end - window..end]))
}

/// Direction of a short/long moving-average crossing between two steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossover {
    /// Short average moved from at-or-below to above the long average.
    Upward,
    /// Short average moved from at-or-above to below the long average.
    Downward,
    /// No crossing.
    None,
}

/// Short and long averages at a step and at the step before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossoverSnapshot {
    /// Short average ending before the current step.
    pub short: Decimal,
    /// Long average ending before the current step.
    pub long: Decimal,
    /// Short average ending before the previous step.
    pub prev_short: Decimal,
    /// Long average ending before the previous step.
    pub prev_long: Decimal,
}

impl CrossoverSnapshot {
    /// Computes the averages for step `index` of `closes`.
    ///
    /// Returns `None` if either lagged window would run past the start of the
    /// series, i.e. for `index <= long_window`.
    #[must_use]
    pub fn at(
        closes: &[Decimal],
        index: usize,
        short_window: usize,
        long_window: usize,
    ) -> Option<Self> {
        if index == 0 {
            return None;
        }
        Some(Self {
            short: trailing_average(closes, index, short_window)?,
            long: trailing_average(closes, index, long_window)?,
            prev_short: trailing_average(closes, index - 1, short_window)?,
            prev_long: trailing_average(closes, index - 1, long_window)?,
        })
    }

    /// Classifies the crossing between the previous and current step.
    #[must_use]
    pub fn signal(&self) -> Crossover {
        if self.prev_short <= self.prev_long && self.short > self.long {
            Crossover::Upward
        } else if self.prev_short >= self.prev_long && self.short < self.long {
            Crossover::Downward
        } else {
            Crossover::None
        }
    }
}
