//! stockbook REST API entry point.
//!
//! Binary name: `stockbook`
//!
//! Parses CLI arguments, initializes the database and repositories, then
//! starts the HTTP server.

mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use state::AppState;
use stockbook_infra::config::resolve_data_dir;

#[derive(Parser)]
#[command(name = "stockbook", version, about = "Record-keeping service for financial instruments")]
struct Cli {
    /// Address to bind (overrides config.toml)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config.toml)
    #[arg(long)]
    port: Option<u16>,

    /// Data directory (defaults to $STOCKBOOK_DATA_DIR or ~/.stockbook)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,stockbook=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let data_dir = cli.data_dir.unwrap_or_else(resolve_data_dir);
    let state = AppState::init(&data_dir).await?;

    let host = cli.host.unwrap_or_else(|| state.config.host.clone());
    let port = cli.port.unwrap_or(state.config.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} stockbook API listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
