//! spa-router
//!
//! Serves the single-page application in history mode and inspects its
//! route table.
//!
//! ```text
//!   config (TOML / BASE_URL) ──▶ app::build_router ──▶ routing::Router
//!                                                          │
//!            ┌─────────────────────────────────────────────┤
//!            ▼                          ▼                  ▼
//!     `serve` (axum)             `routes` (table)   `resolve <location>`
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use spa_router::config::{loader, validation::validate_config, AppConfig, ConfigError};
use spa_router::lifecycle::{signals, Shutdown};
use spa_router::observability::logging::init_logging;
use spa_router::{app, HttpServer};

#[derive(Parser)]
#[command(name = "spa-router")]
#[command(about = "Route table and history-mode server for the web application", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "SPA_ROUTER_CONFIG")]
    config: Option<PathBuf>,

    /// Base path the application is served under (overrides config and BASE_URL).
    #[arg(short, long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the application (default)
    Serve,
    /// Print the route table
    Routes,
    /// Resolve a location and print the matched route as JSON
    Resolve {
        /// Location such as `/login?redirect=%2F`
        location: String,
    },
}

fn load(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => loader::from_env()?,
    };
    if let Some(base) = &cli.base_url {
        config.base_url = base.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;
    init_logging(&config.observability);

    let router = app::build_router(&config.base_url)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Routes => {
            for record in router.routes() {
                let href = router
                    .resolve(&record.path)
                    .map(|r| r.href)
                    .unwrap_or_else(|_| "-".to_string());
                println!(
                    "{:<12} {:<12} {:<12} {}",
                    record.name,
                    record.path,
                    record.component.name(),
                    href
                );
            }
        }
        Commands::Resolve { location } => {
            let route = router.resolve(&location)?;
            println!("{}", serde_json::to_string_pretty(&route)?);
        }
        Commands::Serve => {
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                base_url = %config.base_url,
                bind_address = %config.server.bind_address,
                "spa-router starting"
            );

            let listener = TcpListener::bind(&config.server.bind_address).await?;
            let shutdown = Arc::new(Shutdown::new());
            let server = HttpServer::new(config, Arc::new(router));
            let server_shutdown = shutdown.subscribe();

            let signal_shutdown = Arc::clone(&shutdown);
            tokio::spawn(async move {
                signals::shutdown_on_signal(&signal_shutdown).await;
            });

            server.run(listener, server_shutdown).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
