//! Fixed account and sizing parameters shared by every run.

use rust_decimal::Decimal;

/// Starting account balance for every run.
pub const INITIAL_BALANCE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Fraction of the current balance committed to each new position.
pub const POSITION_SIZE_FRACTION: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// Default short moving-average window.
pub const DEFAULT_SHORT_WINDOW: usize = 20;

/// Default long moving-average window.
pub const DEFAULT_LONG_WINDOW: usize = 50;
