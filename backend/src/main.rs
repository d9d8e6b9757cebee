//! Main entry point for the accounts backend.
//!
//! This file initializes the Axum web server, sets up the database
//! connection, and registers all API routes and middleware.
//! It orchestrates the application's startup and defines its overall structure.

use backend::config::Config;
use backend::database::Database;
use backend::router::build_router;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    let pool = db.pool().clone();

    let app = build_router(pool, config.clone());

    let listener = bind_listener(config.server_port).await.unwrap();

    info!(
        "Starting {} on {}",
        config.app_name,
        listener.local_addr().unwrap()
    );
    axum::serve(listener, app).await.unwrap();
}

/// Binds the configured port, scanning the next 100 ports when it is taken.
async fn bind_listener(port: u16) -> anyhow::Result<tokio::net::TcpListener> {
    for candidate in port..=port.saturating_add(100) {
        match tokio::net::TcpListener::bind(("0.0.0.0", candidate)).await {
            Ok(listener) => {
                if candidate != port {
                    tracing::warn!("Port {} is not available, using port {}", port, candidate);
                }
                return Ok(listener);
            }
            Err(_) => continue,
        }
    }

    anyhow::bail!(
        "no available port found between {} and {}",
        port,
        port.saturating_add(100)
    )
}
