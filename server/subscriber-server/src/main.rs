use clap::Parser;
use colored::*;
use tracing::info;

use error_common::{IcareError, Result};
use subscriber_server::{create_app, logging, AppConfig, SubscriberServer};

/// iCare Subscriber Engine HTTP Server
#[derive(Parser, Debug)]
#[command(name = "subscriber-server")]
#[command(about = "Subscriber pharmacy store HTTP API server")]
struct Args {
    /// Server bind address, overrides `server.host`
    #[arg(long, env = "ICARE_HOST")]
    host: Option<String>,

    /// Server port, overrides `server.port`
    #[arg(short, long, env = "ICARE_PORT")]
    port: Option<u16>,

    /// Configuration file path (extension optional)
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())
        .map_err(|e| IcareError::ConfigError(format!("Failed to load configuration: {}", e)))?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    logging::init_tracing(&config.logging, args.verbose)?;
    if !config.logging.json {
        print_startup_banner();
    }

    let addr = config.bind_address();
    info!("💊 {}", format!("Starting {}", config.server.name).bright_cyan());
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION").bright_white());
    info!("🌐 Bind address: {}", addr.bright_yellow());

    let server = SubscriberServer::new(config)
        .await
        .map_err(|e| IcareError::DatabaseError(format!("Failed to initialise database: {}", e)))?;

    let db = server.db.clone();
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| IcareError::NetworkError(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("🚀 {}", format!("Subscriber engine running on http://{}", addr).bright_green());
    info!("📋 {}", format!("Health check available at: http://{}/health", addr).bright_blue());
    info!("🛒 {}", format!("Store endpoints: http://{}/app", addr).bright_blue());
    info!("📖 {}", format!("API docs: http://{}/docs", addr).bright_blue());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| IcareError::ServerError(format!("HTTP server error: {}", e)))?;

    db.close().await;
    info!("👋 Subscriber engine stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutdown signal received, draining connections");
}

fn print_startup_banner() {
    println!("{}", "╔══════════════════════════════════════════════════════════════╗".bright_cyan());
    println!("{}", "║                    💊 ICARE SUBSCRIBER ENGINE                 ║".bright_cyan());
    println!("{}", "║              Nearby Pharmacy Stores and Orders               ║".bright_cyan());
    println!("{}", "╚══════════════════════════════════════════════════════════════╝".bright_cyan());
    println!();
}
