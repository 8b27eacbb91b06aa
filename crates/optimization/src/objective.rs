use crate::orchestrator::RunOutcome;
use pbt_domain::value_objects::BacktestResult;
use rust_decimal::Decimal;
use std::cmp::Ordering;

pub trait ObjectiveFunction {
    fn name(&self) -> &'static str;
    fn evaluate(&self, result: &BacktestResult) -> Decimal;
    fn compare(&self, a: &BacktestResult, b: &BacktestResult) -> Ordering {
        self.evaluate(a).cmp(&self.evaluate(b))
    }
}

pub struct MaximizeReturn;
impl ObjectiveFunction for MaximizeReturn {
    fn name(&self) -> &'static str {
        "return"
    }

    fn evaluate(&self, result: &BacktestResult) -> Decimal {
        result.percentage_return
    }
}

pub struct MaximizeProfit;
impl ObjectiveFunction for MaximizeProfit {
    fn name(&self) -> &'static str {
        "profit"
    }

    fn evaluate(&self, result: &BacktestResult) -> Decimal {
        result.total_profit
    }
}

pub struct MaximizeWinRate;
impl ObjectiveFunction for MaximizeWinRate {
    fn name(&self) -> &'static str {
        "win rate"
    }

    fn evaluate(&self, result: &BacktestResult) -> Decimal {
        result.win_rate
    }
}

/// Highest-scoring successful outcome; ties go to the lowest run id.
pub fn best_outcome<'a, O>(outcomes: &'a [RunOutcome], objective: &O) -> Option<&'a RunOutcome>
where
    O: ObjectiveFunction + ?Sized,
{
    let mut best: Option<(&'a RunOutcome, &'a BacktestResult)> = None;
    for outcome in outcomes {
        let Some(run) = outcome.run() else {
            continue;
        };
        let candidate = &run.result;
        best = match best {
            None => Some((outcome, candidate)),
            Some((current, current_result)) => match objective.compare(candidate, current_result) {
                Ordering::Greater => Some((outcome, candidate)),
                Ordering::Equal if outcome.run_id < current.run_id => Some((outcome, candidate)),
                _ => best,
            },
        };
    }
    best.map(|(outcome, _)| outcome)
}
