//! cpupin daemon
//!
//! Serves vCPU pinning suggestions over HTTP.

use anyhow::Context;
use clap::Parser;
use cpupin_api::create_router;
use cpupin_core::DaemonConfig;
use cpupin_scheduler::Scheduler;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// cpupind - vCPU pinning suggestions from lscpu topology
#[derive(Parser, Debug)]
#[command(name = "cpupind")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind the API server
    #[arg(long)]
    address: Option<String>,

    /// Port for the API server
    #[arg(long)]
    port: Option<u16>,

    /// Public host every request must be addressed to
    #[arg(long)]
    public_host: Option<String>,

    /// Debug mode, accepts any Host header
    #[arg(short, long)]
    debug: bool,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,
}

/// Merge the configuration file (if any) with command line overrides
fn resolve_config(args: &Args) -> anyhow::Result<DaemonConfig> {
    let mut config = match &args.config {
        Some(path) => DaemonConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DaemonConfig::default(),
    };

    if let Some(address) = &args.address {
        config.api.address = address.clone();
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(public_host) = &args.public_host {
        config.api.public_host = public_host.clone();
    }
    if args.debug {
        config.api.debug = true;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    Ok(config)
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&config.logging.level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting tracing subscriber")?;

    info!("Starting cpupin daemon v{}", env!("CARGO_PKG_VERSION"));

    let addr: SocketAddr = config
        .api
        .socket_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.api.socket_addr()))?;

    info!(
        debug = config.api.debug,
        public_host = %config.api.public_host,
        "API server listening on {}",
        addr
    );

    let router = create_router(Arc::new(Scheduler::new()), config.api);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, router).await.context("server error")?;

    Ok(())
}
