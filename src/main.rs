use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fonlens::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fonlens::AppCommand {
    fn from(cmd: Commands) -> fonlens::AppCommand {
        match cmd {
            Commands::Fetch => fonlens::AppCommand::Fetch,
            Commands::Export { output } => fonlens::AppCommand::Export { output },
            Commands::Funds => fonlens::AppCommand::Funds,
            Commands::Periods { fund } => fonlens::AppCommand::Periods { fund },
            Commands::Holdings { fund, period } => fonlens::AppCommand::Holdings { fund, period },
            Commands::Changes { fund } => fonlens::AppCommand::Changes { fund },
            Commands::Popular { period } => fonlens::AppCommand::Popular { period },
            Commands::Distribution { fund } => fonlens::AppCommand::Distribution { fund },
            Commands::Dashboard { fund, period } => {
                fonlens::AppCommand::Dashboard { fund, period }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Download daily closes and sector data for every held ticker
    Fetch,
    /// Copy the fetched price file to another location
    Export {
        #[arg(short, long, default_value = "stock_close_data.csv")]
        output: PathBuf,
    },
    /// List funds with their latest report period
    Funds,
    /// List the report periods of a fund, newest first
    Periods {
        #[arg(short, long)]
        fund: String,
    },
    /// Show a fund's holdings for one period
    Holdings {
        #[arg(short, long)]
        fund: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Compare a fund's two most recent periods
    Changes {
        #[arg(short, long)]
        fund: String,
    },
    /// Rank tickers by how many funds hold them
    Popular {
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Count holders of each ticker per period
    Distribution {
        #[arg(short, long)]
        fund: Option<String>,
    },
    /// Show every view for one fund
    Dashboard {
        #[arg(short, long)]
        fund: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => fonlens::cli::setup::setup_at_path(path),
            None => fonlens::cli::setup::setup(),
        },
        Some(cmd) => fonlens::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
