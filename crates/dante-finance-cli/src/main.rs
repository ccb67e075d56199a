mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::amortization::{PaymentArgs, ScheduleArgs};
use commands::simulator::SimulateArgs;
use output::Pagination;

/// Loan amortization schedules and payment simulations
#[derive(Parser)]
#[command(
    name = "dante",
    version,
    about = "Loan amortization schedules and payment simulations",
    long_about = "A CLI for DANTE Finance debt calculations with decimal precision. \
                  Builds fixed-payment amortization schedules, compares a current \
                  payment against a proposed one, and finds the level payment for a term."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, env = "DANTE_OUTPUT", default_value = "json", global = true)]
    output: OutputFormat,

    /// Show only this page of schedule rows (table and CSV output)
    #[arg(long, global = true)]
    page: Option<usize>,

    /// Schedule rows per page
    #[arg(long, default_value_t = 12, global = true)]
    page_size: usize,

    /// Log computation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the period-by-period amortization schedule for a fixed payment
    Schedule(ScheduleArgs),
    /// Compare payoff time and interest between two payments
    Simulate(SimulateArgs),
    /// Level monthly payment that retires a loan within a term
    Payment(PaymentArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Simulate(args) => commands::simulator::run_simulate(args),
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Version => {
            println!("dante {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    let pagination = Pagination {
        page: cli.page,
        page_size: cli.page_size,
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, &pagination);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
