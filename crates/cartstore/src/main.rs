mod app;
mod config;
mod context;
mod handlers;
mod repository;
mod state;
mod store;

use std::sync::Arc;

use anyhow::{Context, Result};
use cartstore_core::store::KeyValueStore;
use clap::{Parser, ValueEnum};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    app::create_app,
    config::Config,
    state::AppState,
    store::{MemoryStore, RedisConnector, UnavailableStore},
};

/// Which backend holds the carts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// In-process map, lost on restart
    Memory,
    /// Redis, configured through the `REDIS_*` variables
    Redis,
}

/// Cartstore - Session-scoped shopping carts backed by Redis
#[derive(Parser, Debug)]
#[command(name = "cartstore")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,

    /// Cart store backend
    #[arg(long, value_enum, default_value = "redis", env = "CART_STORE")]
    store: StoreKind,

    /// Keep serving when Redis is unreachable at startup
    #[arg(long, env = "ALLOW_DEGRADED_START")]
    allow_degraded_start: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cartstore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let store = build_store(&cli, &config).await?;
    let state = AppState::new(store, &config);
    tracing::info!(
        store = ?cli.store,
        policy = ?state.carts.policy(),
        "Cart repository ready"
    );

    // Build the application router
    let app = create_app(state);

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
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connect the configured cart store.
///
/// An unreachable Redis aborts startup unless degraded start is allowed, in
/// which case every store call fails and the repository applies its policy.
async fn build_store(cli: &Cli, config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    match cli.store {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory cart store, carts are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Redis => {
            match RedisConnector::connect_with_retry(&config.store, &config.connect_retry).await {
                Ok(connector) => Ok(Arc::new(connector)),
                Err(err) if cli.allow_degraded_start => {
                    tracing::error!(
                        error = %err,
                        policy = ?config.degrade_policy,
                        "Redis unreachable, starting degraded"
                    );
                    Ok(Arc::new(UnavailableStore::new(&err)))
                }
                Err(err) => Err(err).with_context(|| {
                    format!(
                        "failed to connect to Redis at {}:{}",
                        config.store.host, config.store.port
                    )
                }),
            }
        }
    }
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
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
}
