mod browse;
mod compare;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "comoprecio")]
#[command(about = "Price scrapers for the ComoPrecio comparison site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search AliExpress in a visible browser and save the product cards
    Search {
        /// Search term typed into AliExpress
        #[arg(default_value = "women clothes")]
        term: String,
    },
    /// Scrape every catalog product from each of its stores
    Compare {
        /// Only run the Amazon parser for a single known product
        #[arg(long)]
        test: bool,
    },
    /// Attach to an open browser page and capture cards while you scroll
    Watch {
        /// DevTools websocket URL, e.g. `ws://127.0.0.1:9222/devtools/browser/<id>`
        #[arg(long)]
        ws_url: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match comoprecio_core::load_app_config() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_level);
    tracing::debug!(%config, "configuration loaded");

    let result = match cli.command {
        Commands::Search { term } => browse::run_search(&config, &term).await,
        Commands::Compare { test: false } => compare::run_compare(&config).await,
        Commands::Compare { test: true } => compare::run_test_mode(&config).await,
        Commands::Watch { ws_url } => browse::run_watch(&config, &ws_url).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "fatal error");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise the configured level.
fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
