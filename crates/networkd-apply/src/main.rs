//! networkd-apply entry point.
//!
//! Reads generated interface descriptors and writes their artifacts,
//! restarts the network, or both.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use networkd_apply::{load_descriptors, ConfigWriter, NetworkRestarter};
use networkd_common::config::DEFAULT_CONFIG_PATH;
use networkd_common::ApplyConfig;

/// Apply generated systemd-networkd configuration
#[derive(Parser, Debug)]
#[command(name = "networkd-apply")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write artifacts into the runtime directory
    Write {
        /// JSON file with interface descriptors
        descriptors: PathBuf,
    },
    /// Bring links down, load modules and restart networkd
    Restart {
        /// JSON file with interface descriptors
        descriptors: PathBuf,
    },
    /// Write artifacts, then restart
    Apply {
        /// JSON file with interface descriptors
        descriptors: PathBuf,
    },
}

/// Initialize tracing/logging.
fn init_logging(level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = ApplyConfig::load_or_default(&args.config)?;
    info!(
        "Runtime dir {}, unit {}",
        config.networkd.runtime_dir.display(),
        config.networkd.unit
    );

    let writer = ConfigWriter::from_config(&config.networkd);
    let restarter = NetworkRestarter::with_host(&config);

    match args.command {
        Command::Write { descriptors } => {
            let interfaces = load_descriptors(&descriptors)?;
            writer.write_configs(&interfaces)?;
            info!("Wrote artifacts for {} interfaces", interfaces.len());
        }
        Command::Restart { descriptors } => {
            let interfaces = load_descriptors(&descriptors)?;
            restarter.restart_network(&interfaces).await?;
        }
        Command::Apply { descriptors } => {
            let interfaces = load_descriptors(&descriptors)?;
            restarter.apply(&writer, &interfaces).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.log_level) {
        eprintln!("networkd-apply: {:#}", e);
        return ExitCode::FAILURE;
    }

    info!("--- Starting networkd-apply ---");

    match run(args).await {
        Ok(()) => {
            info!("networkd-apply finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("networkd-apply error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
