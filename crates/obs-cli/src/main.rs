//! Observer panel CLI
//!
//! Usage:
//!   obs init [path]                     Write a default .obs/config.toml
//!   obs serve                           Run the web panel
//!   obs list                            Print metrics and their observers
//!   obs add <metric> <callback-url>     Register an observer
//!   obs delete <metric> <observer>      Remove an observer

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use obs_core::{FetchMode, ObsError, ObserverKey, PanelConfig};
use obs_panel::{render, ObserverPanel, SharedPanel};
use std::path::PathBuf;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "obs")]
#[command(author, version, about = "Manage observers of monitoring metrics")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to .obs/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the metrics API base URL
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Project directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Serve the observer panel over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open a browser tab
        #[arg(long)]
        no_open: bool,

        /// Fetch observer lists concurrently
        #[arg(long)]
        concurrent: bool,
    },

    /// List metrics and their observers
    List,

    /// Register a callback URL on a metric
    Add {
        /// Metric identifier
        metric: String,

        /// Callback URL to notify
        callback_url: String,
    },

    /// Remove an observer from a metric
    Delete {
        /// Metric identifier
        metric: String,

        /// Observer identifier
        observer: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Commands::Init { path } = &cli.command {
        return cmd_init(path);
    }

    let config = load_config(cli.config.as_deref(), cli.api_url)?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Serve {
            port,
            no_open,
            concurrent,
        } => cmd_serve(config, port, no_open, concurrent).await,
        Commands::List => cmd_list(&config).await,
        Commands::Add {
            metric,
            callback_url,
        } => cmd_add(&config, &metric, &callback_url).await,
        Commands::Delete { metric, observer } => cmd_delete(&config, &metric, &observer).await,
    }
}

fn load_config(path: Option<&std::path::Path>, api_url: Option<String>) -> Result<PanelConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => PanelConfig::default_path(&std::env::current_dir()?),
    };

    let mut config = PanelConfig::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    if let Some(url) = api_url {
        config.api.base_url = url;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_init(path: &std::path::Path) -> Result<()> {
    let config_path = PanelConfig::default_path(path);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    PanelConfig::write_default(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Wrote default config to {}", config_path.display());
    Ok(())
}

async fn cmd_serve(
    mut config: PanelConfig,
    port: Option<u16>,
    no_open: bool,
    concurrent: bool,
) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if no_open {
        config.server.open_browser = false;
    }
    if concurrent {
        config.panel.fetch_mode = FetchMode::Concurrent;
    }
    config.validate()?;

    obs_panel::run(config).await.context("Observer panel server failed")
}

async fn loaded_panel(config: &PanelConfig) -> Result<SharedPanel> {
    let mut panel = ObserverPanel::connect(config)?;
    if let Err(e) = panel.reload().await {
        warn!("Load incomplete: {}", e);
    }
    Ok(panel)
}

async fn cmd_list(config: &PanelConfig) -> Result<()> {
    let panel = loaded_panel(config).await?;
    print!("{}", render::render_text(panel.state()));
    if panel.state().error().is_some() {
        anyhow::bail!("Failed to list observers from {}", config.api.base_url);
    }
    Ok(())
}

async fn cmd_add(config: &PanelConfig, metric: &str, callback_url: &str) -> Result<()> {
    let mut panel = ObserverPanel::connect(config)?;
    let outcome = panel.add_observer(metric, callback_url).await;
    if reloaded_after(&outcome) {
        print!("{}", render::render_text(panel.state()));
    }
    outcome.with_context(|| format!("Failed to add observer to {}", metric))
}

/// Whether a mutation got far enough to reload the panel.
/// Rejected input never reaches the server, so there is no listing to show.
fn reloaded_after(outcome: &obs_core::Result<()>) -> bool {
    !matches!(outcome, Err(ObsError::InvalidInput(_)))
}

async fn cmd_delete(config: &PanelConfig, metric: &str, observer: &str) -> Result<()> {
    let mut panel = ObserverPanel::connect(config)?;
    let key = ObserverKey::new(observer, metric);
    let outcome = panel.delete_observer(&key).await;
    print!("{}", render::render_text(panel.state()));
    outcome.with_context(|| format!("Failed to delete observer {}", key))
}
