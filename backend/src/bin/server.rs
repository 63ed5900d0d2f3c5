//! Geo Game HTTP Server Binary
//!
//! Loads configuration, builds the repository selected by the environment,
//! and serves the REST API until Ctrl-C or SIGTERM.
//!
//! # Usage
//!
//! ```bash
//! # In-memory repository (default, ENV=dev)
//! cargo run --bin geogame-server
//!
//! # PostGIS repository
//! ENV=prod PG_HOST=localhost TOKEN_SECRET=change-me \
//!   cargo run --bin geogame-server --features "postgres-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `ENV`: `dev` or `prod` (default: dev)
//! - `HOST` / `PORT`: bind address (default: 0.0.0.0:8080)
//! - `TOKEN_SECRET`: token signing key, required when `ENV=prod`
//! - `REPOSITORY_TYPE`: `local` or `postgres`, overrides the `ENV` choice
//! - `RUST_LOG`: log filter (default: debug in dev, info in prod)

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use geogame::config::{AppConfig, Environment};
use geogame::db::RepositoryFactory;
use geogame::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;
    init_tracing(config.environment);

    info!(environment = %config.environment, "Starting Geo Game HTTP Server");
    if config.token_secret.is_empty() {
        warn!("TOKEN_SECRET is not set; session tokens are signed with an empty key");
    }

    let repository = RepositoryFactory::from_env()
        .await
        .context("failed to initialise repository")?;
    info!("Repository initialized successfully");

    let addr = config.bind_address();
    let state = AppState::new(repository, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(environment: Environment) {
    let default_level = match environment {
        Environment::Dev => "debug",
        Environment::Prod => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());

    match environment {
        Environment::Prod => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        Environment::Dev => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
