//! Doces API - CRUD service for a sweets shop
//!
//! Exposes products (`/doces`), customers (`/clientes`) and orders
//! (`/pedidos`) over HTTP, backed by PostgreSQL. Every request checks one
//! connection out of the pool, runs a single statement and returns it.

mod config;
mod db;
mod error;
mod models;
mod routes;
mod state;

use crate::config::Settings;
use crate::error::DbErrorKind;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("🍭 Starting Doces API...");

    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    let pool = db::create_pool(&settings.database)?;
    let state = Arc::new(AppState::new(pool));

    // The server starts either way; requests report the failure themselves
    if let Err(e) = db::probe(&state.db_pool).await {
        let kind = e.db_kind().unwrap_or(DbErrorKind::Other);
        let (_, message) = kind.status_and_message();
        warn!("⚠️  Database not reachable at startup: {} ({})", message, e);
    }

    let app = create_router(state, &settings);

    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("❌ Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("🌐 Servidor rodando em http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   GET    /                     - Liveness");
    info!("   GET    /doces                - List products");
    info!("   POST   /doces                - Create product");
    info!("   DELETE /doces/{{id}}           - Delete product");
    info!("   PUT    /doces/{{id}}/estoque   - Update stock");
    info!("   GET    /clientes             - List customers");
    info!("   POST   /clientes             - Create customer");
    info!("   PUT    /clientes/{{id}}        - Update customer");
    info!("   DELETE /clientes/{{id}}        - Delete customer");
    info!("   GET    /pedidos              - List orders");
    info!("   POST   /pedidos              - Create order");
    info!("   PUT    /pedidos/{{id}}         - Update order");
    info!("   DELETE /pedidos/{{id}}         - Delete order");
    info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,doces_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
