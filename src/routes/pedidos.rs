//! Order route handlers

use crate::error::{ApiResult, AppError};
use crate::models::{CreatedResponse, MessageResponse, Pedido, PedidoRequest};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info};

pub async fn list_pedidos(State(state): State<SharedState>) -> ApiResult<Json<Vec<Pedido>>> {
    debug!("Listing pedidos");

    let pedidos = state.pedidos.list().await?;
    Ok(Json(pedidos))
}

/// Create an order stamped with the database's current time
pub async fn create_pedido(
    State(state): State<SharedState>,
    WithRejection(Json(payload), _): WithRejection<Json<PedidoRequest>, AppError>,
) -> ApiResult<Json<CreatedResponse>> {
    let id = state.pedidos.create(&payload).await?;

    info!("Pedido {} created", id);
    Ok(Json(CreatedResponse::new("Pedido cadastrado com sucesso!", id)))
}

pub async fn update_pedido(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    WithRejection(Json(payload), _): WithRejection<Json<PedidoRequest>, AppError>,
) -> ApiResult<Json<MessageResponse>> {
    let affected = state.pedidos.update(id, &payload).await?;

    info!("Updated pedido {} ({} rows)", id, affected);
    Ok(Json(MessageResponse::new("Pedido atualizado com sucesso!")))
}

pub async fn delete_pedido(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    let affected = state.pedidos.delete(id).await?;

    info!("Deleted pedido {} ({} rows)", id, affected);
    Ok(Json(MessageResponse::new("Pedido excluído com sucesso!")))
}
