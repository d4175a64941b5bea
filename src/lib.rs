pub mod api;
pub mod cli;
pub mod core;
pub mod store;

use crate::core::InvestmentService;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::net::SocketAddr;
use tracing::{debug, info};

pub enum AppCommand {
    Funds,
    Simulate {
        user_id: String,
        deposits: Vec<(String, f64)>,
    },
    Serve {
        listen_addr: Option<SocketAddr>,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Roundup starting...");

    let mut config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    let service = InvestmentService::from_config(&config).await;

    match command {
        AppCommand::Funds => cli::funds::run(&service),
        AppCommand::Simulate { user_id, deposits } => {
            cli::simulate::run(&service, &user_id, &deposits).await
        }
        AppCommand::Serve { listen_addr } => {
            if let Some(addr) = listen_addr {
                config.server.listen_addr = addr;
            }
            api::serve(service, &config.server).await
        }
    }
}
