//! Serve command - starts the API server.

use anyhow::{Context, Result};
use colored::Colorize;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::warn;

use sj_api::{ApiServer, ApiServerConfig, AppState};

use crate::config::AppConfig;

/// Server configuration from CLI arguments.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Port to listen on.
    pub port: u16,
    /// Hostname to bind to.
    pub host: String,
    /// Enable Swagger UI.
    pub enable_swagger: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ServeConfig {
    /// Server settings from the config file, without CLI overrides.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            port: config.server.port,
            host: config.server.host.clone(),
            enable_swagger: config.server.enable_swagger,
            timeout_secs: config.server.request_timeout_secs,
        }
    }
}

/// Runs the API server.
pub async fn run_server(config: ServeConfig, app_config: AppConfig) -> Result<()> {
    println!("{} Starting SOAR Jobs API Server...", "[server]".cyan());

    let mut state = AppState::new(app_config.pipeline.clone(), app_config.share_link.clone());

    if app_config.server.enable_metrics {
        match sj_observability::install_prometheus_recorder() {
            Ok(handle) => {
                println!("  {} Prometheus recorder installed", "✓".green());
                state = state.with_prometheus_handle(handle);
            }
            Err(e) => warn!(error = %e, "Failed to install Prometheus recorder"),
        }
    }

    let bind_address: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid bind address")?;

    let server_config = ApiServerConfig {
        bind_address,
        request_timeout: Duration::from_secs(config.timeout_secs),
        enable_swagger: config.enable_swagger,
        shutdown_timeout: Duration::from_secs(app_config.server.shutdown_timeout_secs),
    };

    println!();
    println!("{}", "SOAR Jobs API Server".bold());
    println!("{}", "═".repeat(40));
    println!("  {} http://{}", "Address:".cyan(), bind_address);
    println!(
        "  {} match_upn={} rewrite_queries={}",
        "Pipeline:".cyan(),
        app_config.pipeline.match_upn,
        app_config.pipeline.rewrite_queries
    );

    if config.enable_swagger {
        println!(
            "  {} http://{}/swagger-ui",
            "Swagger UI:".cyan(),
            bind_address
        );
    }

    println!();
    println!("{}", "Endpoints:".bold());
    println!("  GET  /health                  - Health check");
    println!("  GET  /ready                   - Readiness probe");
    println!("  GET  /live                    - Liveness probe");
    println!("  POST /api/MakeJob             - Build enrichment queries");
    println!("  POST /api/MakeLaShareUrl      - Build a Log Analytics share link");
    println!("  GET  /metrics                 - Prometheus metrics");
    println!();
    println!("Press {} to stop", "Ctrl+C".yellow());
    println!();

    let server = ApiServer::new(state, server_config);
    server.run().await.context("Server error")?;

    println!();
    println!("{} Server stopped", "[server]".cyan());

    Ok(())
}
