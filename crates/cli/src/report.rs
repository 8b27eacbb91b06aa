//! Terminal summaries.

use crate::resolutions::Resolution;
use pbt_data::sink::risk_descriptor;
use pbt_domain::value_objects::{BacktestResult, StrategyConfig};
use pbt_optimization::{ObjectiveFunction, RunId, RunOutcome, best_outcome};
use prettytable::{Table, row};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Best run of a batch under some objective.
#[derive(Debug, Clone)]
pub struct BestRun {
    pub run_id: RunId,
    pub config: StrategyConfig,
    pub result: BacktestResult,
}

/// Outcome counts and best run of one resolution's batch.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub resolution: String,
    pub runs: usize,
    pub failed: usize,
    pub best: Option<BestRun>,
    pub output: PathBuf,
}

impl BatchSummary {
    /// Summarizes `outcomes`, picking the best run by `objective`.
    pub fn new<O>(resolution: &str, outcomes: &[RunOutcome], objective: &O, output: PathBuf) -> Self
    where
        O: ObjectiveFunction + ?Sized,
    {
        let best = best_outcome(outcomes, objective).and_then(|outcome| {
            outcome.run().map(|run| BestRun {
                run_id: outcome.run_id,
                config: outcome.config,
                result: run.result.clone(),
            })
        });

        Self {
            resolution: resolution.to_string(),
            runs: outcomes.len(),
            failed: outcomes.iter().filter(|o| !o.is_success()).count(),
            best,
            output,
        }
    }
}

/// One row per batch with its best run.
pub fn summary_table(summaries: &[BatchSummary]) -> Table {
    let mut table = Table::new();
    table.set_titles(row![
        "Resolution",
        "Runs",
        "Failed",
        "Best",
        "Risk",
        "Trades",
        "Win Rate",
        "Profit",
        "Final Balance",
        "Return %",
        "Output"
    ]);

    for summary in summaries {
        let output = summary.output.display().to_string();
        match &summary.best {
            Some(best) => {
                table.add_row(row![
                    summary.resolution,
                    summary.runs,
                    summary.failed,
                    best.run_id,
                    risk_descriptor(&best.config),
                    best.result.trade_count,
                    rounded(best.result.win_rate * Decimal::ONE_HUNDRED),
                    rounded(best.result.total_profit),
                    rounded(best.result.final_balance),
                    rounded(best.result.percentage_return),
                    output
                ]);
            }
            None => {
                table.add_row(row![
                    summary.resolution,
                    summary.runs,
                    summary.failed,
                    "-",
                    "-",
                    "-",
                    "-",
                    "-",
                    "-",
                    "-",
                    output
                ]);
            }
        }
    }
    table
}

/// One row per resolution with its sweep candidates.
pub fn grid_table(resolutions: &[Resolution], short_window: usize, long_window: usize) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Resolution", "File", "Stop Losses", "Take Profits", "Runs"]);
    for resolution in resolutions {
        table.add_row(row![
            resolution.name,
            resolution.file,
            join(&resolution.stop_losses),
            join(&resolution.take_profits),
            resolution.grid(short_window, long_window).len()
        ]);
    }
    table
}

fn rounded(value: Decimal) -> Decimal {
    value.round_dp(2)
}

fn join(values: &[Decimal]) -> String {
    values
        .iter()
        .map(|v| v.normalize().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
