//! CLI commands implementation

use anyhow::{Context, Result};
use cpupin_scheduler::Scheduler;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// API client for communicating with the daemon
pub struct ApiClient {
    base_url: String,
    host: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, host: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            host: host.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Status response from API
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub debug: bool,
    pub public_host: String,
}

/// Read topology text from a file, or stdin for `-` or no path
pub fn read_topology(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading topology from {}", path.display())),
        _ => std::io::read_to_string(std::io::stdin()).context("reading topology from stdin"),
    }
}

/// Ask the daemon for a pinning suggestion
pub async fn suggest(client: &ApiClient, vcpu: usize, topology: Option<PathBuf>) -> Result<()> {
    let lscpu = read_topology(topology.as_deref())?;
    debug!(vcpu = vcpu, lscpu_bytes = lscpu.len(), "Requesting suggestion");

    let response = client
        .client
        .post(client.url("/v1/cpupin/"))
        .header(reqwest::header::HOST, client.host.as_str())
        .form(&[("vcpu", vcpu.to_string()), ("lscpu", lscpu)])
        .send()
        .await?;

    if response.status().is_success() {
        print!("{}", response.text().await?);
    } else {
        let error = response.text().await?;
        anyhow::bail!("Failed to get suggestion: {}", error.trim_end());
    }

    Ok(())
}

/// Compute a pinning suggestion in-process
pub fn local(vcpu: usize, topology: Option<PathBuf>) -> Result<()> {
    let lscpu = read_topology(topology.as_deref())?;
    let fragment = Scheduler::new().suggest(&lscpu, vcpu)?;
    print!("{}", fragment);
    Ok(())
}

/// Show daemon status
pub async fn status(client: &ApiClient) -> Result<()> {
    let response = client
        .client
        .get(client.url("/v1/status"))
        .header(reqwest::header::HOST, client.host.as_str())
        .send()
        .await?;

    if response.status().is_success() {
        let status: StatusResponse = response.json().await?;

        println!("cpupind v{}", status.version);
        println!();
        println!("Public host: {}", status.public_host);
        println!("Debug: {}", status.debug);
    } else {
        let error = response.text().await?;
        anyhow::bail!("Failed to get status: {}", error.trim_end());
    }

    Ok(())
}
