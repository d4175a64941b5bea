use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use roundup::core::log::init_logging;
use std::net::SocketAddr;

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

impl From<Commands> for roundup::AppCommand {
    fn from(cmd: Commands) -> roundup::AppCommand {
        match cmd {
            Commands::Funds => roundup::AppCommand::Funds,
            Commands::Simulate { user, deposits } => roundup::AppCommand::Simulate {
                user_id: user,
                deposits,
            },
            Commands::Serve { listen } => roundup::AppCommand::Serve {
                listen_addr: listen,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn parse_deposit(arg: &str) -> Result<(String, f64), String> {
    roundup::cli::simulate::parse_deposit(arg).map_err(|e| e.to_string())
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List funds with a fresh quote
    Funds,
    /// Apply deposits to a fresh portfolio and show its valuation
    Simulate {
        /// User the deposits belong to
        #[arg(short, long, default_value = "demo")]
        user: String,

        /// Deposit as FUND=AMOUNT, may be repeated
        #[arg(short, long = "deposit", value_parser = parse_deposit, required = true)]
        deposits: Vec<(String, f64)>,
    },
    /// Serve the HTTP API
    Serve {
        /// Address to listen on, overrides the configuration
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => roundup::cli::setup::setup(),
        Some(cmd) => roundup::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
