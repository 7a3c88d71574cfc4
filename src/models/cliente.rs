//! Customer ("cliente") models and DTOs

use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// A row of the `clientes` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cliente {
    pub id: i32,
    pub nome: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub cpf: Option<String>,
}

impl TryFrom<&Row> for Cliente {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            telefone: row.try_get("telefone")?,
            endereco: row.try_get("endereco")?,
            cpf: row.try_get("cpf")?,
        })
    }
}

/// Body for creating or updating a customer. Fields are stored as given,
/// absent ones as NULL.
#[derive(Debug, Default, Deserialize)]
pub struct ClienteRequest {
    pub nome: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub cpf: Option<String>,
}
