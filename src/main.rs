// File: src/main.rs
// Version: 0.3.0 - Multi-interface WiFi RRM dashboard (CLI, TUI and Web views)
// Tree: rrm-dashboard/src/main.rs

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli_interface;
mod config;
mod dashboard;
mod data_models;
mod fixtures;
mod html_view;
mod refresh;
mod tui_dashboard;
mod web_server;
mod widgets;

use crate::config::AppConfig;
use crate::data_models::Tab;
use crate::fixtures::Fixtures;

/// Command-line interface definition for the RRM dashboard
/// Supports multiple interface modes: CLI, TUI and Web
#[derive(Parser)]
#[command(name = "rrm-dashboard")]
#[command(about = "WiFi radio resource management dashboard with TUI and Web views")]
#[command(version = "0.3.0")]
pub struct Cli {
    /// Interface mode selection
    #[command(subcommand)]
    pub mode: InterfaceMode,
}

/// Available interface modes
#[derive(Subcommand)]
pub enum InterfaceMode {
    /// Print one dashboard tab as text tables
    Cli {
        /// Tab to render ("Overview", "Access Points", "Recent Changes")
        #[arg(short, long, default_value = "overview")]
        tab: Tab,

        /// Expand the row of this access point (repeatable)
        #[arg(short, long, value_name = "AP_ID")]
        expand: Vec<String>,
    },

    /// Terminal UI dashboard (ratatui)
    /// Live KPI refresh with interactive tabs and expandable rows
    Tui {
        /// KPI refresh interval in milliseconds
        #[arg(short, long)]
        refresh_ms: Option<u64>,
    },

    /// Web server with dashboard (axum + WebSocket)
    /// Browser-based dashboard with live KPI updates
    Web {
        /// Server port
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address
        #[arg(short, long)]
        bind: Option<String>,

        /// Enable CORS for development
        #[arg(short, long)]
        cors: bool,

        /// KPI refresh interval in milliseconds
        #[arg(short, long)]
        refresh_ms: Option<u64>,
    },
}

/// Main application entry point
/// Routes to appropriate interface mode based on CLI arguments
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal; log output would corrupt the screen
    if !matches!(cli.mode, InterfaceMode::Tui { .. }) {
        init_tracing()?;
    }

    let config = AppConfig::from_env()?;
    let fixtures = Arc::new(Fixtures::demo());

    match cli.mode {
        InterfaceMode::Cli { tab, expand } => {
            cli_interface::run_cli_mode(fixtures, tab, &expand).await
        }

        InterfaceMode::Tui { refresh_ms } => {
            let config = config.with_overrides(refresh_ms, None, None)?;
            println!("📊 RRM Dashboard - Terminal Dashboard");
            tui_dashboard::run_tui_mode(fixtures, &config).await
        }

        InterfaceMode::Web { port, bind, cors, refresh_ms } => {
            let config = config.with_overrides(refresh_ms, bind, port)?;
            println!("🌐 RRM Dashboard - Web Server Mode");
            println!("Starting server at http://{}:{}", config.bind, config.port);
            web_server::run_web_mode(fixtures, &config, cors).await
        }
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rrm_dashboard=info".parse()?),
        )
        .try_init()?;
    Ok(())
}
