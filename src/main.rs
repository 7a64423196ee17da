// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use evalhub_runtime::config::Config;
use evalhub_runtime::kubernetes::ClusterConnection;
use evalhub_runtime::manifests::{ManifestRenderer, Placeholders};
use evalhub_runtime::{Cancellation, Provisioner};

#[derive(Parser, Debug)]
#[command(name = "evalhub-runtime", about = "Provision Kubernetes objects from manifest templates")]
struct Cli {
    /// Manifest directory (overrides EVAL_HUB_MANIFESTS_DIR)
    #[arg(long, global = true)]
    manifests_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a rendered manifest without contacting the cluster
    Render {
        manifest: String,
        /// Placeholder value, as NAME=VALUE
        #[arg(long = "set", value_parser = parse_placeholder)]
        set: Vec<(String, String)>,
    },
    /// Render a manifest and create the resulting object in the cluster
    Apply {
        manifest: String,
        /// Placeholder value, as NAME=VALUE
        #[arg(long = "set", value_parser = parse_placeholder)]
        set: Vec<(String, String)>,
        /// Deadline for the cluster calls, in seconds (defaults to EVAL_HUB_REQUEST_TIMEOUT_SECS)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

fn parse_placeholder(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got {raw:?}"))?;
    if name.is_empty() {
        return Err(anyhow!("placeholder name is empty in {raw:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.manifests_dir {
        config.manifests_dir = dir;
    }
    info!("Using manifests from {}", config.manifests_dir.display());

    let renderer = ManifestRenderer::new(&config.manifests_dir);

    match cli.command {
        Command::Render { manifest, set } => {
            let placeholders: Placeholders = set.into_iter().collect();
            let rendered = renderer
                .render(&manifest, &placeholders)
                .await
                .with_context(|| format!("Failed to render {manifest}"))?;
            print!("{}", String::from_utf8_lossy(&rendered));
        }
        Command::Apply {
            manifest,
            set,
            timeout,
        } => {
            let placeholders: Placeholders = set.into_iter().collect();
            let connection = ClusterConnection::connect(&config).await?;
            info!("Connected to Kubernetes cluster");

            let provisioner = Provisioner::new(connection, renderer);
            let timeout = timeout.map(Duration::from_secs).unwrap_or(config.request_timeout);
            let (cancel, handle) = Cancellation::with_timeout(timeout);

            let created = tokio::select! {
                res = provisioner.create_resource_from_file(&cancel, &manifest, &placeholders) => res,
                _ = tokio::signal::ctrl_c() => {
                    handle.cancel();
                    Err(evalhub_runtime::RuntimeError::Cancelled)
                }
            }
            .with_context(|| format!("Failed to apply {manifest}"))?;

            info!(
                "Created {} {} (uid {})",
                created.api_version(),
                created.name().unwrap_or_default(),
                created.uid().unwrap_or_default()
            );
        }
    }

    Ok(())
}
