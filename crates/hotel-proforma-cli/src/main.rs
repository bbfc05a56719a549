mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::financing::DebtArgs;
use commands::projection::PlArgs;
use commands::Session;

/// Hotel development pro-forma projections
#[derive(Parser)]
#[command(
    name = "hpf",
    version,
    about = "Hotel development pro-forma projections",
    long_about = "A CLI for projecting hotel development deals with decimal precision. \
                  Produces rooms KPIs, a USALI departmental P&L, the senior debt \
                  schedule and exit returns from a deal record in JSON or YAML."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Deal file (JSON or YAML); read from stdin when omitted
    #[arg(long, global = true)]
    input: Option<String>,

    /// Engine settings file (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Deal to run when the input holds several
    #[arg(long, global = true)]
    deal_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// USALI P&L statement, one column per projection year
    Pl(PlArgs),
    /// Rooms KPIs (keys, rooms sold, ADR, occupancy, RevPAR)
    Kpis,
    /// Senior loan amortization schedule
    Debt(DebtArgs),
    /// Exit valuation and IRRs
    Exit,
    /// Full pro-forma: KPIs, P&L, debt, sources & uses, exit
    Proforma,
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dispatch(session: &Session, command: Commands) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    match command {
        Commands::Pl(args) => commands::projection::run_pl(session, args),
        Commands::Kpis => commands::projection::run_kpis(session),
        Commands::Debt(args) => commands::financing::run_debt(session, args),
        Commands::Exit => commands::financing::run_exit(session),
        Commands::Proforma => commands::projection::run_proforma(session),
        Commands::Version => Ok(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Version => {
            println!("hpf {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        command => Session::open(cli.input.as_deref(), cli.config.as_deref(), cli.deal_id.as_deref())
            .and_then(|session| dispatch(&session, command)),
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
