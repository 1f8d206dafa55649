//! scalegated — the scale request gateway daemon.
//!
//! Sits between callers (operators, autoscalers, API clients) and the
//! provider that applies replica counts. Every scale request is validated
//! and clamped before it is forwarded.
//!
//! # Usage
//!
//! ```text
//! scalegated serve --upstream http://faas-provider:8081 --port 8080
//! scalegated check-config --config /etc/scalegate/scalegate.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use scalegated::{DaemonConfig, Forwarder, build_app};

const DEFAULT_LOG_FILTER: &str = "info,scalegated=debug,scalegate_api=debug,scalegate_core=debug";

#[derive(Parser)]
#[command(name = "scalegated", about = "Scale request gateway daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the gateway.
    Serve {
        /// Port to listen on (overrides the config file).
        #[arg(long)]
        port: Option<u16>,

        /// Path to scalegate.toml.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Provider base URL (overrides the config file).
        #[arg(long)]
        upstream: Option<String>,

        /// Emit logs as JSON.
        #[arg(long)]
        json_logs: bool,
    },
    /// Validate a config file and print the effective configuration.
    CheckConfig {
        #[arg(long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            config,
            upstream,
            json_logs,
        } => {
            init_tracing(json_logs);
            let mut daemon_config = match config {
                Some(path) => DaemonConfig::from_file(&path)?,
                None => DaemonConfig::default(),
            };
            if let Some(port) = port {
                daemon_config.server.port = port;
            }
            if upstream.is_some() {
                daemon_config.server.upstream = upstream;
            }
            run(daemon_config).await
        }
        Command::CheckConfig { config } => {
            let daemon_config = DaemonConfig::from_file(&config)?;
            print!("{}", daemon_config.to_toml_string()?);
            Ok(())
        }
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run(config: DaemonConfig) -> anyhow::Result<()> {
    let Some(upstream) = config.server.upstream.as_deref() else {
        bail!("no upstream configured; pass --upstream or set server.upstream");
    };
    let forwarder = Forwarder::new(upstream)?;

    let scaling = Arc::new(config.scaling);
    info!(
        upstream = %forwarder.upstream(),
        max_replicas = scaling.max_replicas,
        min_replicas = scaling.min_replicas,
        scaling_factor = scaling.scaling_factor,
        scale_type = %scaling.scale_type,
        labelled_services = scaling.labels.len(),
        "scalegate starting"
    );

    let router = build_app(scaling, forwarder);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to install CTRL+C handler");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("scalegate stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_names_every_crate() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        for target in ["scalegated=debug", "scalegate_api=debug", "scalegate_core=debug"] {
            assert!(DEFAULT_LOG_FILTER.split(',').any(|d| d == target), "{target}");
        }
    }
}
