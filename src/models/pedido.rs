//! Order ("pedido") models and DTOs

use super::integral_i32;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// A row of the `pedidos` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pedido {
    pub id: i32,
    pub cliente: Option<String>,
    pub doce: Option<String>,
    pub quantidade: Option<i32>,
    /// Assigned by the database at insert time
    pub data_pedido: DateTime<Utc>,
}

impl TryFrom<&Row> for Pedido {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            cliente: row.try_get("cliente")?,
            doce: row.try_get("doce")?,
            quantidade: row.try_get("quantidade")?,
            data_pedido: row.try_get("data_pedido")?,
        })
    }
}

/// Body for creating or updating an order. There is no client-supplied
/// timestamp; any `data_pedido` in the body is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PedidoRequest {
    pub cliente: Option<String>,
    pub doce: Option<String>,
    #[serde(default, deserialize_with = "integral_i32")]
    pub quantidade: Option<i32>,
}
