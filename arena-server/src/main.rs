//! arena-server - pairwise model vote service
//!
//! Serves `POST /vote` and `GET /leaderboard` (plus `/health`) from a local
//! SQLite database under the resolved root folder.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use arena_common::config::{load_config, RootFolderInitializer, RootFolderResolver};
use arena_common::db::init_database;
use arena_server::services::maintenance::spawn_purge_task;
use arena_server::{build_router, AppState, VotePolicy};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MODULE_NAME: &str = "arena-server";

/// Command-line arguments for arena-server
#[derive(Parser, Debug)]
#[command(name = "arena-server")]
#[command(about = "Pairwise model vote and leaderboard service")]
#[command(version)]
struct Args {
    /// Address to bind (overrides [server].bind)
    #[arg(long, env = "ARENA_BIND")]
    bind: Option<String>,

    /// Port to listen on (overrides [server].port)
    #[arg(short, long, env = "ARENA_PORT")]
    port: Option<u16>,

    /// Root folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arena_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification before anything that can stall
    info!(
        "Starting arena-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = load_config(MODULE_NAME, args.config.as_deref())
        .context("Failed to load configuration")?;

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(args.root_folder.clone())
        .with_config(&config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let policy = VotePolicy {
        retention: arena_common::time::days(config.server.retention_days),
    };
    info!(
        "Vote records retained for {} days",
        config.server.retention_days
    );

    if config.server.purge_interval_secs > 0 {
        spawn_purge_task(
            pool.clone(),
            Duration::from_secs(config.server.purge_interval_secs),
        );
    } else {
        info!("Expired-record purge disabled");
    }

    let app = build_router(AppState::new(pool, policy));

    let bind = args.bind.unwrap_or(config.server.bind);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("arena-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
