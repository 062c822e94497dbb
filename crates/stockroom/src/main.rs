mod app;
mod cache;
mod config;
mod dashboard;
mod handlers;
mod mock_data;
mod state;
mod storage;

use anyhow::Result;
use clap::{Parser, Subcommand};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{app::create_app, config::Config, state::AppState};

/// Stockroom - Cached dashboards for multi-shop retail
#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST", global = true)]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT", global = true)]
    port: u16,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API and run the background warmer (default)
    Serve,
    /// Warm the dashboard cache without serving HTTP
    Warm {
        /// Keep warming on the configured interval until interrupted
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockroom=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let state = AppState::new(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(state, &cli.host, cli.port).await,
        Command::Warm { watch: false } => warm_once(state).await,
        Command::Warm { watch: true } => warm_forever(state).await,
    }
}

/// Serve the API until a shutdown signal arrives.
async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let warmer_task = if state.config.warm_enabled {
        state.warmer.start(state.subscribe_shutdown())
    } else {
        tracing::info!("Cache warmer disabled");
        None
    };

    // Build the application router
    let app = create_app(state.clone());

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", host, port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    if let Some(task) = warmer_task {
        task.await?;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Run a single warming cycle and print its report.
async fn warm_once(state: AppState) -> Result<()> {
    let report = state.warmer.warm_all().await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.failed > 0 {
        anyhow::bail!("{} of {} warming targets failed", report.failed, report.targets);
    }
    Ok(())
}

/// Run the warmer on its interval until a shutdown signal arrives.
async fn warm_forever(state: AppState) -> Result<()> {
    let Some(task) = state.warmer.start(state.subscribe_shutdown()) else {
        anyhow::bail!("cache warmer is already running");
    };

    shutdown_signal(state).await;
    task.await?;

    tracing::info!("Warmer stopped");
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM) and notify background tasks.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    // Stop the warmer loop
    state.signal_shutdown();
}
