//! stockdesk server: game, trading and shop APIs over one SQLite database.
//!
//! # Usage
//! ```sh
//! SERVER_PORT=8080 cargo run -- --database sqlite://data/stockdesk.db
//! ```
//!
//! # Environment Variables
//! - `SERVER_BIND_ADDRESS` / `SERVER_PORT` - Listener (default: 127.0.0.1:8080)
//! - `DATABASE_URL` - SQLite URL (default: sqlite://data/stockdesk.db)
//! - `SESSION_TTL_MINUTES` - Game login session lifetime (default: 60)

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use stockdesk::application::bootstrap::{AppServices, PersistenceBootstrap};
use stockdesk::config::Config;
use stockdesk::interfaces::http::create_router;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind, overrides SERVER_BIND_ADDRESS
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on, overrides SERVER_PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite URL, overrides DATABASE_URL
    #[arg(short, long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let mut config = Config::from_env()?;
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(database) = cli.database {
        config.database.url = database;
    }

    info!("{} {} starting...", config.app_name, env!("CARGO_PKG_VERSION"));

    let db = PersistenceBootstrap::init(&config.database).await?;
    let services = AppServices::new(&db, &config);
    let app = create_router(services);

    let address = config.server.socket_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}. Press Ctrl+C to shutdown.", address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed")?;

    db.pool.close().await;
    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received. Draining requests...");
    }
}
