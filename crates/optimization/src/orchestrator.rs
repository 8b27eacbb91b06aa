//! Concurrent execution of a strategy grid.
//!
//! Every strategy gets its own task. Tasks share the price series read-only
//! through an `Arc` and report back over a channel sized to the number of
//! tasks, so no producer ever waits on a full buffer. The runner joins every
//! task before closing the channel and draining it.
//!
//! A run that cannot execute (bad parameters, too little data, a panic) still
//! yields exactly one [`RunOutcome`], carrying a [`RunError`] instead of a
//! result. Sibling runs are unaffected.

use crate::error::RunError;
use pbt_domain::entities::price_series::PriceSeries;
use pbt_domain::value_objects::StrategyConfig;
use pbt_simulation::strategies::{BacktestStrategy, MovingAverageCrossover, StrategyRun};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn};

/// Sequential label assigned to a run at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(pub usize);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Test {}", self.0)
    }
}

/// Result of one run, tagged with its id and originating configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Spawn-order identifier.
    pub run_id: RunId,
    /// Name of the strategy that ran.
    pub strategy: &'static str,
    /// Parameters the run used.
    pub config: StrategyConfig,
    /// The run output, or why there is none.
    pub result: Result<StrategyRun, RunError>,
}

impl RunOutcome {
    /// Whether the run produced a result.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The run output, if the run succeeded.
    #[must_use]
    pub fn run(&self) -> Option<&StrategyRun> {
        self.result.as_ref().ok()
    }

    /// The failure, if the run failed.
    #[must_use]
    pub fn error(&self) -> Option<&RunError> {
        self.result.as_ref().err()
    }
}

/// Runs a batch of strategies concurrently against one series.
#[derive(Debug, Clone)]
pub struct GridRunner {
    /// Batch label used in logs (e.g. the resolution name).
    label: String,
}

impl GridRunner {
    /// Creates a runner whose log output is tagged with `label`.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Runs one moving-average crossover per configuration.
    pub async fn run_grid(
        &self,
        configs: Vec<StrategyConfig>,
        series: Arc<PriceSeries>,
    ) -> Vec<RunOutcome> {
        let strategies = configs.into_iter().map(MovingAverageCrossover::new).collect();
        self.run(strategies, series).await
    }

    /// Runs every strategy in its own task and collects all outcomes.
    ///
    /// Returns exactly one outcome per strategy, in completion order. Run ids
    /// follow the order of `strategies`.
    pub async fn run<S>(&self, strategies: Vec<S>, series: Arc<PriceSeries>) -> Vec<RunOutcome>
    where
        S: BacktestStrategy + Send + 'static,
    {
        let total = strategies.len();
        if total == 0 {
            return Vec::new();
        }
        info!(
            batch = %self.label,
            runs = total,
            observations = series.len(),
            "Starting backtest batch"
        );

        let (tx, mut rx) = mpsc::channel::<RunOutcome>(total);
        let mut handles: Vec<(RunId, &'static str, StrategyConfig, JoinHandle<()>)> =
            Vec::with_capacity(total);

        for (index, strategy) in strategies.into_iter().enumerate() {
            let run_id = RunId(index);
            let name = strategy.name();
            let config = *strategy.config();
            let tx = tx.clone();
            let series = Arc::clone(&series);
            let label = self.label.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let span = info_span!("backtest_run", batch = %label, run_id = %run_id);
                let _enter = span.enter();

                let outcome = execute_run(run_id, &strategy, &series);
                // Capacity equals the task count, so the buffer cannot be full.
                if let Err(err) = tx.try_send(outcome) {
                    warn!(error = %err, "Dropping run outcome");
                }
            });
            handles.push((run_id, name, config, handle));
        }

        for (run_id, name, config, handle) in handles {
            if let Err(join_err) = handle.await {
                warn!(batch = %self.label, %run_id, error = %join_err, "Run task failed");
                let outcome = RunOutcome {
                    run_id,
                    strategy: name,
                    config,
                    result: Err(RunError::TaskFailed(join_err.to_string())),
                };
                // The failed task never sent, so its slot is still free.
                if let Err(err) = tx.try_send(outcome) {
                    warn!(error = %err, "Dropping run outcome");
                }
            }
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(
            batch = %self.label,
            runs = outcomes.len(),
            failed,
            "Backtest batch complete"
        );
        outcomes
    }
}

/// Validates and executes one strategy.
fn execute_run<S: BacktestStrategy>(
    run_id: RunId,
    strategy: &S,
    series: &PriceSeries,
) -> RunOutcome {
    let config = *strategy.config();
    let result = match strategy.validate(series) {
        Ok(()) => {
            debug!(
                stop_loss = %config.stop_loss,
                take_profit = %config.take_profit,
                "Executing run"
            );
            Ok(strategy.execute(series))
        }
        Err(err) => {
            warn!(error = %err, "Skipping run");
            Err(RunError::from(err))
        }
    };

    RunOutcome {
        run_id,
        strategy: strategy.name(),
        config,
        result,
    }
}
