//! Command Line Interface for the parallel grid-search backtester.
mod report;
mod resolutions;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use pbt_data::{load_price_series, write_results};
use pbt_domain::defaults::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use pbt_domain::entities::price_series::PriceSeries;
use pbt_optimization::{
    GridRunner, MaximizeProfit, MaximizeReturn, MaximizeWinRate, ObjectiveFunction,
};
use report::BatchSummary;
use resolutions::Resolution;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pbt")]
#[command(about = "Parallel grid-search backtester for moving-average crossover strategies")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the parameter grid of each resolution and write the results
    Run(RunArgs),
    /// Print the parameter tables
    List {
        /// JSON file replacing the built-in parameter tables
        #[arg(long, env = "PBT_GRID_CONFIG")]
        grid_config: Option<PathBuf>,

        /// Short moving-average window
        #[arg(long, env = "PBT_SHORT_WINDOW", default_value_t = DEFAULT_SHORT_WINDOW)]
        short_window: usize,

        /// Long moving-average window
        #[arg(long, env = "PBT_LONG_WINDOW", default_value_t = DEFAULT_LONG_WINDOW)]
        long_window: usize,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Resolution to run; repeat or comma-separate for several (default: all)
    #[arg(short, long = "resolution", env = "PBT_RESOLUTIONS", value_delimiter = ',')]
    resolutions: Vec<String>,

    /// Directory holding the price files
    #[arg(long, env = "PBT_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Directory the results files are written to
    #[arg(long, env = "PBT_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Short moving-average window
    #[arg(long, env = "PBT_SHORT_WINDOW", default_value_t = DEFAULT_SHORT_WINDOW)]
    short_window: usize,

    /// Long moving-average window
    #[arg(long, env = "PBT_LONG_WINDOW", default_value_t = DEFAULT_LONG_WINDOW)]
    long_window: usize,

    /// JSON file replacing the built-in parameter tables
    #[arg(long, env = "PBT_GRID_CONFIG")]
    grid_config: Option<PathBuf>,

    /// Ranking used to pick the best run in the summary
    #[arg(long, env = "PBT_OBJECTIVE", value_enum, default_value_t = Objective::Return)]
    objective: Objective,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Objective {
    Return,
    Profit,
    WinRate,
}

impl Objective {
    fn function(self) -> Box<dyn ObjectiveFunction> {
        match self {
            Objective::Return => Box::new(MaximizeReturn),
            Objective::Profit => Box::new(MaximizeProfit),
            Objective::WinRate => Box::new(MaximizeWinRate),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::List {
            grid_config,
            short_window,
            long_window,
        } => {
            let tables = parameter_tables(grid_config.as_deref())?;
            report::grid_table(&tables, short_window, long_window).printstd();
            Ok(())
        }
    }
}

fn parameter_tables(grid_config: Option<&Path>) -> Result<Vec<Resolution>> {
    match grid_config {
        Some(path) => resolutions::load_resolutions(path),
        None => Ok(resolutions::default_resolutions()),
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let tables = parameter_tables(args.grid_config.as_deref())?;
    let selected = resolutions::select(tables, &args.resolutions)?;

    // Every input must load before any run starts.
    let mut batches = Vec::with_capacity(selected.len());
    for resolution in selected {
        let input = args.data_dir.join(&resolution.file);
        let series = load_price_series(&input)
            .with_context(|| format!("failed to load price data from {}", input.display()))?;
        batches.push((resolution, Arc::new(series)));
    }

    let objective = args.objective.function();
    let mut summaries = Vec::with_capacity(batches.len());
    for (resolution, series) in batches {
        let summary = run_resolution(&resolution, series, &args, objective.as_ref()).await?;
        summaries.push(summary);
    }

    println!("Best run per resolution by {}:", objective.name());
    report::summary_table(&summaries).printstd();
    Ok(())
}

async fn run_resolution(
    resolution: &Resolution,
    series: Arc<PriceSeries>,
    args: &RunArgs,
    objective: &dyn ObjectiveFunction,
) -> Result<BatchSummary> {
    info!(resolution = %resolution.name, "Running backtests");

    let configs = resolution.grid(args.short_window, args.long_window).build();
    let runner = GridRunner::new(resolution.name.as_str());
    let mut outcomes = runner.run_grid(configs, series).await;
    outcomes.sort_by_key(|outcome| outcome.run_id);

    for outcome in &outcomes {
        if let Some(err) = outcome.error() {
            warn!(
                resolution = %resolution.name,
                run_id = %outcome.run_id,
                stop_loss = %outcome.config.stop_loss,
                take_profit = %outcome.config.take_profit,
                error = %err,
                "Run produced no result"
            );
        }
    }

    let output = args.output_dir.join(resolution.output_file_name());
    let rows = write_results(&output, &outcomes)
        .with_context(|| format!("failed to write results to {}", output.display()))?;
    info!(resolution = %resolution.name, rows, path = %output.display(), "Results written");

    Ok(BatchSummary::new(&resolution.name, &outcomes, objective, output))
}
