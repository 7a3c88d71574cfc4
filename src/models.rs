//! Data models and DTOs (Data Transfer Objects)
//!
//! Row types for the three tables and the request/response bodies of the API.
//! JSON field names follow the database column names.

pub mod cliente;
pub mod doce;
pub mod pedido;

// Re-export commonly used types
pub use cliente::*;
pub use doce::*;
pub use pedido::*;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

/// Accept any JSON number with no fractional part as an `i32`, so `10.0`
/// reads the same as `10`. `null` and absent fields stay `None`.
pub(crate) fn integral_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) if n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 => {
            Ok(Some(n as i32))
        }
        Some(n) => Err(D::Error::custom(format!(
            "invalid value: {n}, expected a whole number"
        ))),
    }
}

/// Message-only response (no data)
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub mensagem: String,
}

impl MessageResponse {
    pub fn new(mensagem: impl Into<String>) -> Self {
        Self {
            mensagem: mensagem.into(),
        }
    }
}

/// Response for inserts that report the generated id
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub mensagem: String,
    pub id: i32,
}

impl CreatedResponse {
    pub fn new(mensagem: impl Into<String>, id: i32) -> Self {
        Self {
            mensagem: mensagem.into(),
            id,
        }
    }
}
