//! SOAR Jobs CLI
//!
//! Command-line interface for the SOAR Jobs enrichment service.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;

use commands::{
    run_decode_share_url, run_make_job, run_server, run_share_url, run_validate_job, MakeJobArgs,
    ServeConfig,
};
use config::AppConfig;
use sj_core::ShareLinkRequest;
use sj_observability::{init_logging_with_config, LoggingConfig};

#[derive(Parser)]
#[command(name = "soar-jobs")]
#[command(version)]
#[command(about = "Builds enrichment queries from Sentinel incidents", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "SOAR_JOBS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Disable Swagger UI
        #[arg(long)]
        no_swagger: bool,
    },

    /// Build enrichment queries for an incident from local files
    MakeJob {
        /// Sentinel incident JSON file
        #[arg(short, long)]
        incident: PathBuf,

        /// Enrichment job JSON file
        #[arg(short, long)]
        job: PathBuf,

        /// Also write the combined request payload to this file
        #[arg(long, value_name = "FILE")]
        dump: Option<PathBuf>,
    },

    /// Check an enrichment job file against the job rules
    ValidateJob {
        /// Enrichment job JSON file
        job: PathBuf,
    },

    /// Build a Log Analytics share link for a query
    ShareUrl {
        /// Query text
        #[arg(short, long)]
        query: String,

        /// Azure subscription ID
        #[arg(long)]
        subscription_id: String,

        /// Resource group of the workspace
        #[arg(long)]
        resource_group: String,

        /// Log Analytics workspace name
        #[arg(long)]
        workspace_name: String,

        /// Timespan (e.g. P7D)
        #[arg(long, default_value = "")]
        timespan: String,

        /// Pin the query's now() to the current time
        #[arg(long)]
        set_query_now: bool,
    },

    /// Print the query embedded in a share link
    DecodeShareUrl {
        /// Share link URL
        url: String,
    },

    /// Show current configuration
    Config,
}

fn default_config_path() -> PathBuf {
    PathBuf::from("soar-jobs.yaml")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::resolve(cli.config.as_deref(), &default_config_path())?;

    let mut logging = LoggingConfig::from_settings(&config.logging);
    if cli.verbose {
        logging.level = tracing::Level::DEBUG;
    }
    if cli.format == OutputFormat::Json {
        logging.json_format = true;
    }
    init_logging_with_config(logging);

    match cli.command {
        Commands::Serve {
            port,
            host,
            no_swagger,
        } => {
            let mut serve = ServeConfig::from_app_config(&config);
            if let Some(port) = port {
                serve.port = port;
            }
            if let Some(host) = host {
                serve.host = host;
            }
            if no_swagger {
                serve.enable_swagger = false;
            }
            run_server(serve, config).await?;
        }
        Commands::MakeJob {
            incident,
            job,
            dump,
        } => {
            run_make_job(
                MakeJobArgs {
                    incident,
                    job,
                    dump,
                },
                &config.pipeline,
                cli.format,
            )?;
        }
        Commands::ValidateJob { job } => {
            if !run_validate_job(&job, cli.format)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::ShareUrl {
            query,
            subscription_id,
            resource_group,
            workspace_name,
            timespan,
            set_query_now,
        } => {
            run_share_url(
                ShareLinkRequest {
                    query,
                    subscription_id,
                    resource_group,
                    workspace_name,
                    timespan,
                    set_query_now,
                },
                &config.share_link,
                cli.format,
            )?;
        }
        Commands::DecodeShareUrl { url } => run_decode_share_url(&url)?,
        Commands::Config => print!("{}", config.to_yaml()?),
    }

    Ok(ExitCode::SUCCESS)
}
