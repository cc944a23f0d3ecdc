//! Hobart CLI binary.
//!
//! Provides a command-line interface for running the Hobart strategy over
//! CSV data files.

mod inputs;

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use hobart::factors::available_factors;
use hobart::output::{ExportFormat, Exporter, FactorExposureExport};
use hobart::signal::zscore;
use hobart::{RebalanceError, Strategy};
use inputs::{emit, load_config, load_holdings, load_market, resolve_date};
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Exit status when the solver ran out of budget and the run may be retried.
const EXIT_RETRYABLE: i32 = 75;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: daily sentiment and reversal long/short strategy", long_about = None)]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the target portfolio and trades for one date
    Rebalance {
        #[command(flatten)]
        inputs: InputArgs,

        /// Current holdings CSV (symbol,weight)
        #[arg(long)]
        holdings: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,

        /// Print the rebalance report to stderr
        #[arg(long)]
        report: bool,
    },

    /// Compute raw and normalized factor values for one date
    Factors {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// List the available factors and exit
        #[arg(long)]
        list: bool,
    },

    /// Validate and print the effective configuration
    Config {
        /// Strategy config JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Observations CSV (date,symbol,field,value)
    #[arg(long)]
    observations: Option<PathBuf>,

    /// Universe membership CSV (date,symbol); defaults to every observed asset
    #[arg(long)]
    universe: Option<PathBuf>,

    /// Rebalance date (YYYY-MM-DD); defaults to the last session
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Strategy config JSON
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format: csv, json or pretty-json
    #[arg(long, default_value = "csv")]
    format: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        let retryable = e
            .downcast_ref::<RebalanceError>()
            .is_some_and(RebalanceError::is_retryable);
        process::exit(if retryable { EXIT_RETRYABLE } else { 1 });
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Rebalance {
            inputs,
            holdings,
            output,
            report,
        } => run_rebalance(&inputs, holdings, &output, report),
        Commands::Factors { list: true, .. } => {
            list_factors();
            Ok(())
        }
        Commands::Factors { inputs, output, .. } => run_factors(&inputs, &output),
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn observations_path(inputs: &InputArgs) -> Result<&PathBuf, Box<dyn std::error::Error>> {
    inputs
        .observations
        .as_ref()
        .ok_or_else(|| "--observations is required".into())
}

fn run_rebalance(
    inputs: &InputArgs,
    holdings: Option<PathBuf>,
    output: &OutputArgs,
    report: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(inputs.config.as_deref())?;
    let data = load_market(observations_path(inputs)?, inputs.universe.as_deref())?;
    let date = resolve_date(inputs.date, &data)?;
    let current = load_holdings(holdings.as_deref())?;

    let strategy = Strategy::new(config)?;
    let rebalance = strategy.rebalance(date, &data, &data, &current)?;

    if report {
        eprintln!("{}", rebalance.report());
    }
    let content = rebalance.export().export_to_string(output.format)?;
    emit(&content, output.output.as_deref())?;
    Ok(())
}

fn run_factors(inputs: &InputArgs, output: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(inputs.config.as_deref())?;
    let data = load_market(observations_path(inputs)?, inputs.universe.as_deref())?;
    let date = resolve_date(inputs.date, &data)?;

    let strategy = Strategy::new(config)?;
    let panels = strategy.compute_panels(date, &data, &data)?;

    let mut rows = Vec::new();
    for panel in [&panels.sentiment, &panels.returns] {
        let z = zscore(panel);
        for gap in panel.gaps() {
            tracing::info!(%gap, "excluded");
        }
        for (asset, value) in panel.iter() {
            rows.push(FactorExposureExport::new(
                asset.symbol().to_string(),
                date,
                panel.name().to_string(),
                value,
                z.get(asset).unwrap_or(0.0),
            ));
        }
    }

    emit(&rows.export_to_string(output.format)?, output.output.as_deref())?;
    Ok(())
}

fn list_factors() {
    println!(
        "{:<20} {:<10} {:<16} {:>6}  Description",
        "Factor", "Category", "Field", "Window"
    );
    println!("{}", "-".repeat(96));
    for info in available_factors() {
        println!(
            "{:<20} {:<10} {:<16} {:>6}  {}",
            info.name,
            format!("{:?}", info.category),
            info.field.name(),
            info.default_window,
            info.description
        );
    }
}
