//! Error handling module
//!
//! Every handler returns [`ApiResult`]. Database failures are classified into
//! a [`DbErrorKind`] and that kind alone decides the HTTP status and message.

use axum::{
    extract::rejection::{BytesRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use deadpool_postgres::PoolError;
use serde::Serialize;
use std::error::Error as _;
use thiserror::Error;
use tokio_postgres::error::SqlState;
use tracing::error;

pub const MSG_MISSING_FIELDS: &str = "Campos obrigatórios ausentes.";
pub const MSG_CONNECTION_REFUSED: &str = "Conexão recusada. Ligue o banco de dados.";
pub const MSG_UNKNOWN_DATABASE: &str = "Banco de dados não encontrado.";
pub const MSG_UNKNOWN_TABLE: &str = "Tabela não encontrada. Crie a tabela no banco de dados.";
pub const MSG_INTERNAL: &str = "Erro interno do servidor.";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The request body could not be read or decoded
    #[error("Request body rejected: {message}")]
    Body { status: StatusCode, message: String },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Body {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::Body {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Classification of a database failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    ConnectionRefused,
    UnknownDatabase,
    UnknownTable,
    Other,
}

impl DbErrorKind {
    /// Classify a driver error by SQLSTATE, or by the io error underneath it.
    pub fn of_postgres(err: &tokio_postgres::Error) -> Self {
        if let Some(code) = err.code() {
            return Self::of_sql_state(code);
        }

        let mut source = err.source();
        while let Some(cause) = source {
            if let Some(io) = cause.downcast_ref::<std::io::Error>() {
                if io.kind() == std::io::ErrorKind::ConnectionRefused {
                    return DbErrorKind::ConnectionRefused;
                }
            }
            source = cause.source();
        }

        DbErrorKind::Other
    }

    pub fn of_sql_state(code: &SqlState) -> Self {
        if *code == SqlState::INVALID_CATALOG_NAME {
            DbErrorKind::UnknownDatabase
        } else if *code == SqlState::UNDEFINED_TABLE {
            DbErrorKind::UnknownTable
        } else {
            DbErrorKind::Other
        }
    }

    pub fn of_pool(err: &PoolError) -> Self {
        match err {
            PoolError::Backend(e) => Self::of_postgres(e),
            _ => DbErrorKind::Other,
        }
    }

    /// The fixed status and caller-facing message for this kind.
    pub fn status_and_message(self) -> (StatusCode, &'static str) {
        match self {
            DbErrorKind::ConnectionRefused => (StatusCode::BAD_REQUEST, MSG_CONNECTION_REFUSED),
            DbErrorKind::UnknownDatabase => (StatusCode::BAD_REQUEST, MSG_UNKNOWN_DATABASE),
            DbErrorKind::UnknownTable => (StatusCode::BAD_REQUEST, MSG_UNKNOWN_TABLE),
            DbErrorKind::Other => (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub mensagem: String,
}

impl AppError {
    /// The database classification, or `None` for request-side errors.
    /// Has no side effects.
    pub fn db_kind(&self) -> Option<DbErrorKind> {
        match self {
            AppError::Validation(_) | AppError::Body { .. } => None,
            AppError::Database(e) => Some(DbErrorKind::of_postgres(e)),
            AppError::Pool(e) => Some(DbErrorKind::of_pool(e)),
            AppError::Config(_) => Some(DbErrorKind::Other),
        }
    }

    pub fn status_and_message(&self) -> (StatusCode, String) {
        let kind = match self {
            AppError::Validation(msg) => return (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Body { status, message } => return (*status, message.clone()),
            _ => self.db_kind().unwrap_or(DbErrorKind::Other),
        };

        if kind == DbErrorKind::Other {
            // Detail stays in the log, never in the response
            error!("Erro desconhecido: {:?}", self);
        }

        let (status, message) = kind.status_and_message();
        (status, message.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, mensagem) = self.status_and_message();
        (status, Json(ErrorResponse { mensagem })).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create the missing-fields validation error
pub fn missing_fields_error() -> AppError {
    AppError::Validation(MSG_MISSING_FIELDS.to_string())
}
