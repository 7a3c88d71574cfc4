//! Product ("doce") models and DTOs

use super::integral_i32;
use crate::error::{missing_fields_error, ApiResult};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use validator::Validate;

/// A row of the `doces` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Doce {
    pub id: i32,
    pub nome: String,
    pub tipo: String,
    pub preco: f64,
    pub quantidade: i32,
}

impl TryFrom<&Row> for Doce {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            tipo: row.try_get("tipo")?,
            preco: row.try_get("preco")?,
            quantidade: row.try_get("quantidade")?,
        })
    }
}

/// Request to create a product. Every field is required; the strings must
/// also be non-empty.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDoceRequest {
    #[validate(required, length(min = 1))]
    pub nome: Option<String>,

    #[validate(required, length(min = 1))]
    pub tipo: Option<String>,

    #[validate(required)]
    pub preco: Option<f64>,

    #[validate(required)]
    #[serde(default, deserialize_with = "integral_i32")]
    pub quantidade: Option<i32>,
}

/// A validated product ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewDoce {
    pub nome: String,
    pub tipo: String,
    pub preco: f64,
    pub quantidade: i32,
}

impl CreateDoceRequest {
    /// Check field presence and hand back the insertable product.
    pub fn into_new_doce(self) -> ApiResult<NewDoce> {
        self.validate().map_err(|_| missing_fields_error())?;

        match (self.nome, self.tipo, self.preco, self.quantidade) {
            (Some(nome), Some(tipo), Some(preco), Some(quantidade)) => Ok(NewDoce {
                nome,
                tipo,
                preco,
                quantidade,
            }),
            _ => Err(missing_fields_error()),
        }
    }
}

/// Request to overwrite the stock of a product
#[derive(Debug, Deserialize)]
pub struct UpdateEstoqueRequest {
    #[serde(default, deserialize_with = "integral_i32")]
    pub quantidade: Option<i32>,
}
