//! Customer route handlers

use crate::error::{ApiResult, AppError};
use crate::models::{Cliente, ClienteRequest, CreatedResponse, MessageResponse};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info};

pub async fn list_clientes(State(state): State<SharedState>) -> ApiResult<Json<Vec<Cliente>>> {
    debug!("Listing clientes");

    let clientes = state.clientes.list().await?;
    Ok(Json(clientes))
}

pub async fn create_cliente(
    State(state): State<SharedState>,
    WithRejection(Json(payload), _): WithRejection<Json<ClienteRequest>, AppError>,
) -> ApiResult<Json<CreatedResponse>> {
    let id = state.clientes.create(&payload).await?;

    info!("Cliente {} created", id);
    Ok(Json(CreatedResponse::new("Cliente cadastrado com sucesso!", id)))
}

pub async fn update_cliente(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    WithRejection(Json(payload), _): WithRejection<Json<ClienteRequest>, AppError>,
) -> ApiResult<Json<MessageResponse>> {
    let affected = state.clientes.update(id, &payload).await?;

    info!("Updated cliente {} ({} rows)", id, affected);
    Ok(Json(MessageResponse::new("Cliente atualizado com sucesso!")))
}

pub async fn delete_cliente(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    let affected = state.clientes.delete(id).await?;

    info!("Deleted cliente {} ({} rows)", id, affected);
    Ok(Json(MessageResponse::new("Cliente excluído com sucesso!")))
}
