pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    Fetch,
    Export { output: PathBuf },
    Funds,
    Periods { fund: String },
    Holdings { fund: Option<String>, period: Option<String> },
    Changes { fund: String },
    Popular { period: Option<String> },
    Distribution { fund: Option<String> },
    Dashboard { fund: Option<String>, period: Option<String> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fonlens starting...");

    let config = match config_path {
        Some(path) => crate::core::config::AppConfig::load_from_path(path)?,
        None => crate::core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let workspace = crate::core::Workspace::new(config);

    match command {
        AppCommand::Fetch => cli::fetch::run(&workspace).await,
        AppCommand::Export { output } => cli::export::run(&workspace, &output),
        AppCommand::Funds => cli::funds::run(&workspace).await,
        AppCommand::Periods { fund } => cli::funds::run_periods(&workspace, &fund).await,
        AppCommand::Holdings { fund, period } => {
            cli::holdings::run(&workspace, fund.as_deref(), period.as_deref()).await
        }
        AppCommand::Changes { fund } => cli::changes::run(&workspace, &fund).await,
        AppCommand::Popular { period } => cli::popular::run(&workspace, period.as_deref()).await,
        AppCommand::Distribution { fund } => {
            cli::distribution::run(&workspace, fund.as_deref()).await
        }
        AppCommand::Dashboard { fund, period } => {
            cli::dashboard::run(&workspace, fund.as_deref(), period.as_deref()).await
        }
    }
}
