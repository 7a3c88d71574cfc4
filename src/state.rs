//! Application state management
//!
//! Contains shared state accessible across all handlers. Nothing in here is
//! mutable; the database is the only shared resource.

use crate::db::{ClienteService, DoceService, PedidoService};
use deadpool_postgres::Pool;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Database connection pool
    pub db_pool: Pool,

    pub doces: DoceService,
    pub clientes: ClienteService,
    pub pedidos: PedidoService,
}

impl AppState {
    pub fn new(pool: Pool) -> Self {
        Self {
            doces: DoceService::new(pool.clone()),
            clientes: ClienteService::new(pool.clone()),
            pedidos: PedidoService::new(pool.clone()),
            db_pool: pool,
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
