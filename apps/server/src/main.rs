//! # Jemput Jelantah Dashboard Server
//!
//! HTTP/JSON API serving the role-scoped dashboard operations.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dashboard Server                                 │
//! │                                                                         │
//! │  Frontend ───► HTTP (8080) ───► Handlers ───► jelantah-store           │
//! │                                     │              │                    │
//! │                                     ▼              ▼                    │
//! │                              Object storage   jelantah-core             │
//! │                              (proof uploads)  (billing rule)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod config;
mod error;
mod handlers;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use jelantah_store::seed::seed_demo;
use jelantah_store::Store;

use crate::auth::SessionState;
use crate::config::ServerConfig;
use crate::state::AppState;
use crate::storage::ObjectStorage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    init_tracing();

    info!("Starting Jemput Jelantah dashboard server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        seed = config.seed_demo,
        "Configuration loaded"
    );

    // Build the shared store priced by the configured schedule
    let schedule = config.rate_schedule()?;
    let store = Arc::new(Store::new(schedule));

    if config.seed_demo {
        seed_demo(&store)?;
    }

    // Object storage is optional; without it proof uploads return a typed error
    let storage = match (config.storage_endpoint.as_deref(), config.public_base()) {
        (Some(endpoint), Some(public_base)) => {
            info!(endpoint = %endpoint, "Object storage configured");
            Some(Arc::new(ObjectStorage::new(endpoint, public_base)))
        }
        _ => {
            warn!("Object storage not configured, proof uploads disabled");
            None
        }
    };

    // Create shared state
    let state = AppState::new(
        store,
        SessionState::new(),
        storage,
        Arc::new(config.clone()),
    );

    let app = router(state);

    // Build server address
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Assembles the dashboard router.
fn router(state: AppState) -> Router {
    Router::new()
        // Session
        .route("/api/login", post(handlers::auth::login))
        .route("/api/logout", post(handlers::auth::logout))
        .route("/api/me", get(handlers::auth::me))
        // Customers
        .route(
            "/api/customers",
            get(handlers::customer::list).post(handlers::customer::create),
        )
        .route("/api/customers/{id}", patch(handlers::customer::update))
        // Pickups
        .route(
            "/api/pickups",
            get(handlers::pickup::list).post(handlers::pickup::create),
        )
        .route("/api/pickups/{id}/assign", post(handlers::pickup::assign))
        .route("/api/pickups/{id}/complete", post(handlers::pickup::complete))
        .route("/api/pickups/{id}/proof", post(handlers::pickup::upload_proof))
        // Bills
        .route("/api/bills", get(handlers::bill::list))
        .route("/api/bills/{id}/paid", post(handlers::bill::mark_paid))
        .route(
            "/api/bills/{id}/payment-proof",
            post(handlers::bill::upload_payment_proof),
        )
        // Summary
        .route("/api/summary", get(handlers::summary::get))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=jelantah=trace` - Show trace for jelantah crates only
/// - Default: INFO level, DEBUG for the jelantah crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jelantah=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
