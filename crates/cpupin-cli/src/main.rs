//! cpupin CLI
//!
//! Command-line interface for requesting vCPU pinning suggestions.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// cpupin - vCPU pinning suggestions from lscpu topology
#[derive(Parser, Debug)]
#[command(name = "cpupin")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Daemon API address
    #[arg(long, default_value = "http://localhost:8002", global = true)]
    api: String,

    /// Host header sent to the daemon
    #[arg(long, default_value = "passthroughtools.org", global = true)]
    host: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the daemon for a pinning suggestion
    Suggest {
        /// Number of vCPUs to pin
        #[arg(long)]
        vcpu: usize,

        /// File holding `lscpu -p` output ("-" or omitted reads stdin)
        #[arg(long)]
        topology: Option<PathBuf>,
    },

    /// Compute a pinning suggestion locally, without the daemon
    Local {
        /// Number of vCPUs to pin
        #[arg(long)]
        vcpu: usize,

        /// File holding `lscpu -p` output ("-" or omitted reads stdin)
        #[arg(long)]
        topology: Option<PathBuf>,
    },

    /// Show daemon status
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let client = commands::ApiClient::new(&cli.api, &cli.host);

    match cli.command {
        Commands::Suggest { vcpu, topology } => {
            commands::suggest(&client, vcpu, topology).await?;
        }
        Commands::Local { vcpu, topology } => {
            commands::local(vcpu, topology)?;
        }
        Commands::Status => {
            commands::status(&client).await?;
        }
    }

    Ok(())
}
