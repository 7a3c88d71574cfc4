//! Database connection management
//!
//! Builds the connection pool from [`DatabaseConfig`]. The pool is lazy: no
//! connection is opened until a handler asks for one, so the server starts
//! even when the database is down.

pub mod queries;
pub mod service;

pub use service::{ClienteService, DoceService, PedidoService};

use crate::config::{DatabaseConfig, SslMode};
use crate::error::AppError;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::{debug, info};

/// Create a connection pool with given configuration
pub fn create_pool(config: &DatabaseConfig) -> Result<Pool, AppError> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.database.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(config.max_pool_size.max(1)));
    cfg.options = config
        .schema
        .as_ref()
        .map(|schema| format!("-c search_path={}", schema));

    debug!(
        "Creating pool for {}@{}:{}/{} (TLS: {:?})",
        config.user, config.host, config.port, config.database, config.ssl_mode
    );

    let pool = match config.ssl_mode {
        SslMode::Require => {
            let certs = rustls_native_certs::load_native_certs();
            let mut root_store = rustls::RootCertStore::empty();
            for cert in certs.certs {
                root_store.add(cert).ok();
            }

            let tls_config = rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth();

            let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
            cfg.create_pool(Some(Runtime::Tokio1), tls)
        }
        SslMode::Disable => cfg.create_pool(Some(Runtime::Tokio1), NoTls),
    };

    pool.map_err(|e| AppError::Config(format!("Failed to create pool: {}", e)))
}

/// Check once that the database answers. Callers decide what a failure means.
pub async fn probe(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;
    client.query_one(queries::PING, &[]).await?;
    info!("Database connection successful");
    Ok(())
}
