use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters of one moving-average crossover run.
///
/// Window lengths are counted in observations. Stop-loss and take-profit are
/// fractions of the entry price (0.05 = 5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
}

impl StrategyConfig {
    /// Creates a configuration without validating it.
    ///
    /// Use [`StrategyConfig::validate`] before running it.
    pub fn new(
        short_window: usize,
        long_window: usize,
        stop_loss: Decimal,
        take_profit: Decimal,
    ) -> Self {
        Self {
            short_window,
            long_window,
            stop_loss,
            take_profit,
        }
    }

    /// Checks the configuration on its own.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidConfiguration`] when a window is zero, the
    /// short window is not shorter than the long one, or a fraction lies
    /// outside `(0, 1)`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.short_window == 0 {
            return Err(DomainError::InvalidConfiguration(
                "short window must be at least 1".to_string(),
            ));
        }
        if self.short_window >= self.long_window {
            return Err(DomainError::InvalidConfiguration(format!(
                "short window {} must be shorter than long window {}",
                self.short_window, self.long_window
            )));
        }
        check_fraction("stop loss", self.stop_loss)?;
        check_fraction("take profit", self.take_profit)?;
        Ok(())
    }

    /// Checks the configuration against a series of `series_len` observations.
    ///
    /// # Errors
    /// Everything [`StrategyConfig::validate`] rejects, plus a long window that
    /// is not shorter than the series.
    pub fn validate_for_series(&self, series_len: usize) -> Result<(), DomainError> {
        self.validate()?;
        if self.long_window >= series_len {
            return Err(DomainError::InvalidConfiguration(format!(
                "long window {} needs more than {} observations",
                self.long_window, series_len
            )));
        }
        Ok(())
    }
}

fn check_fraction(name: &str, value: Decimal) -> Result<(), DomainError> {
    if value <= Decimal::ZERO || value >= Decimal::ONE {
        return Err(DomainError::InvalidConfiguration(format!(
            "{name} must lie in (0, 1), got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_config() {
        let config = StrategyConfig::new(2, 4, dec!(0.05), dec!(0.10));
        assert!(config.validate().is_ok());
        assert!(config.validate_for_series(10).is_ok());
    }

    #[test]
    fn test_rejects_inverted_windows() {
        let config = StrategyConfig::new(50, 20, dec!(0.05), dec!(0.10));
        assert!(matches!(
            config.validate(),
            Err(DomainError::InvalidConfiguration(_))
        ));

        let equal = StrategyConfig::new(20, 20, dec!(0.05), dec!(0.10));
        assert!(equal.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = StrategyConfig::new(0, 4, dec!(0.05), dec!(0.10));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_fraction_out_of_range() {
        assert!(
            StrategyConfig::new(2, 4, dec!(0), dec!(0.10))
                .validate()
                .is_err()
        );
        assert!(
            StrategyConfig::new(2, 4, dec!(0.05), dec!(1))
                .validate()
                .is_err()
        );
        assert!(
            StrategyConfig::new(2, 4, dec!(-0.01), dec!(0.10))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_rejects_series_not_longer_than_long_window() {
        let config = StrategyConfig::new(2, 4, dec!(0.05), dec!(0.10));
        assert!(config.validate_for_series(4).is_err());
        assert!(config.validate_for_series(0).is_err());
        assert!(config.validate_for_series(5).is_ok());
    }
}
