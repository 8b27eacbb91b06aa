//! Result file writing.
//!
//! Every successful run contributes one row per equity-curve sample:
//!
//! ```text
//! Date,Account Balance,Backtest ID,Risk
//! 2024-01-09,10000.00,Test 0,"TP: 0.10, SL: 0.05"
//! ```
//!
//! Runs are written in run-id order and each run's rows in date order, so the
//! file is identical across repeated batches. Failed runs write nothing.

use crate::error::DataError;
use pbt_domain::value_objects::StrategyConfig;
use pbt_optimization::RunOutcome;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

const HEADER: [&str; 4] = ["Date", "Account Balance", "Backtest ID", "Risk"];

/// Writes the result rows of `outcomes` to a new file at `path`.
///
/// Returns the number of data rows written.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_results(path: impl AsRef<Path>, outcomes: &[RunOutcome]) -> Result<usize, DataError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = write_records(file, outcomes)?;
    info!(path = %path.display(), rows, "Wrote backtest results");
    Ok(rows)
}

/// Writes the header and result rows of `outcomes` to `writer`.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_records<W: Write>(writer: W, outcomes: &[RunOutcome]) -> Result<usize, DataError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    let mut ordered: Vec<&RunOutcome> = outcomes.iter().collect();
    ordered.sort_by_key(|outcome| outcome.run_id);

    let mut rows = 0;
    for outcome in ordered {
        let Some(run) = outcome.run() else {
            debug!(run_id = %outcome.run_id, "No rows for failed run");
            continue;
        };
        let run_label = outcome.run_id.to_string();
        let risk = risk_descriptor(&outcome.config);

        for (date, balance) in run.equity_curve.iter() {
            csv_writer.write_record([
                date.format("%Y-%m-%d").to_string(),
                format_balance(balance),
                run_label.clone(),
                risk.clone(),
            ])?;
            rows += 1;
        }
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(rows)
}

/// Describes a run's exit thresholds, e.g. `TP: 0.10, SL: 0.05`.
///
/// Values keep their full precision so distinct configurations never collide.
#[must_use]
pub fn risk_descriptor(config: &StrategyConfig) -> String {
    format!(
        "TP: {}, SL: {}",
        with_min_scale(config.take_profit),
        with_min_scale(config.stop_loss)
    )
}

/// Pads to two decimal places without dropping further digits.
fn with_min_scale(value: Decimal) -> Decimal {
    let mut value = value.normalize();
    if value.scale() < 2 {
        value.rescale(2);
    }
    value
}

fn format_balance(balance: Decimal) -> String {
    let mut rounded = balance.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
