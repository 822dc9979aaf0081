mod commands;
mod input;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::credit::CreditArgs;
use commands::offers::OffersArgs;
use commands::validate::ValidateArgs;
use commands::GlobalOptions;

/// Loan offer and annuity credit calculations
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan offer and annuity credit calculations",
    long_about = "A CLI for pricing loan offers and computing final credit terms \
                  with decimal precision. Generates the four insurance / \
                  salary-client offers for a request and computes the annuity \
                  payment, PSK and payment schedule for scored applicants."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a YAML or JSON calculator config
    #[arg(long, global = true)]
    config: Option<String>,

    /// Require applicant identity fields even when using individual flags
    #[arg(long, global = true)]
    strict: bool,

    /// Date the schedule and age checks count from (YYYY-MM-DD, default today)
    #[arg(long, global = true)]
    calculation_date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the four ranked loan offers for a request
    Offers(OffersArgs),
    /// Calculate final credit terms and the payment schedule
    Credit(CreditArgs),
    /// Check a request against the acceptance rules without pricing it
    Validate(ValidateArgs),
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

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let load = || GlobalOptions::load(cli.config.as_deref(), cli.strict, cli.calculation_date);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Offers(args) => load().and_then(|opts| commands::offers::run_offers(args, &opts)),
        Commands::Credit(args) => load().and_then(|opts| commands::credit::run_credit(args, &opts)),
        Commands::Validate(args) => {
            load().and_then(|opts| commands::validate::run_validate(args, &opts))
        }
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
