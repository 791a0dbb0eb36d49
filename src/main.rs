//! Autodash
//!
//! Command-line entry point:
//! - `serve`: load the dataset and run the dashboard server
//! - `config`: print a default config file
//! - `report`: print one panel as JSON
//!
//! # Configuration
//!
//! Settings come from the config file, then `AUTODASH_*` environment
//! variables, then command-line flags. `RUST_LOG` overrides the log level.

use anyhow::Context;
use autodash::api::{serve, AppState};
use autodash::config::{generate_default_config, Config, LoggingConfig};
use autodash::dashboard::{chart_panel, year_disabled, SelectionState};
use autodash::dataset::{load_with_timeout, Dataset, DatasetSource};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "autodash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Automobile Sales Statistics Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the dataset and serve the dashboard
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Dataset URL or file path
        #[arg(short, long)]
        source: Option<String>,
        /// Verbose request and dispatch logging
        #[arg(long)]
        debug: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the panel for one selection as JSON
    Report {
        /// "Yearly Statistics" or "Recession Period Statistics"
        #[arg(short, long)]
        report_type: String,
        /// Year, for the yearly report
        #[arg(short, long)]
        year: Option<String>,
        /// Dataset URL or file path
        #[arg(short, long)]
        source: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };

    match cli.command {
        Commands::Serve {
            host,
            port,
            source,
            debug,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(source) = source {
                config.dataset.source = source;
            }
            config.server.debug |= debug;

            init_logging(&config.logging, config.server.debug);
            tracing::info!("Starting Autodash v{}", env!("CARGO_PKG_VERSION"));

            let dataset = load_dataset(&config).await?;
            let state = AppState::new(
                Arc::new(dataset),
                config.dataset.source.clone(),
                &config.server,
            );

            serve(state, &config.server).await?;
            tracing::info!("Autodash stopped");
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }

        Commands::Report {
            report_type,
            year,
            source,
        } => {
            if let Some(source) = source {
                config.dataset.source = source;
            }
            init_logging(&config.logging, false);

            let selection = SelectionState::from_params(Some(report_type.as_str()), year.as_deref())?;
            let dataset = load_dataset(&config).await?;

            let output = serde_json::json!({
                "selection": selection,
                "year_disabled": year_disabled(selection.report_type),
                "panel": chart_panel(&dataset, &selection),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Install the global subscriber
fn init_logging(logging: &LoggingConfig, debug: bool) {
    let default_filter = if debug {
        "autodash=debug,tower_http=debug".to_string()
    } else {
        format!("autodash={},tower_http=info", logging.level)
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Load the dataset once; any failure here is fatal
async fn load_dataset(config: &Config) -> anyhow::Result<Dataset> {
    let source = DatasetSource::parse(&config.dataset.source);
    let timeout = Duration::from_secs(config.dataset.request_timeout_secs);

    let dataset = load_with_timeout(&source, timeout)
        .await
        .with_context(|| format!("Failed to load dataset from {}", source))?;

    tracing::info!("Dataset summary: {}", dataset.summary());

    Ok(dataset)
}
