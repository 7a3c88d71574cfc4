//! Product route handlers

use crate::error::{missing_fields_error, ApiResult, AppError};
use crate::models::{CreateDoceRequest, Doce, MessageResponse, UpdateEstoqueRequest};
use crate::state::SharedState;
use axum::{
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info};

/// Body of `POST /doces`.
///
/// An absent, blank or `null` body decodes to `None` so the handler can
/// answer with the missing-fields error. The content type is not checked.
/// Other decoding failures keep axum's status, in the `{"mensagem"}` shape.
#[derive(Debug)]
pub struct CreateDoceBody(pub Option<CreateDoceRequest>);

impl<S> FromRequest<S> for CreateDoceBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }

        let Json(payload) = Json::<Option<CreateDoceRequest>>::from_bytes(&bytes)?;
        Ok(Self(payload))
    }
}

/// List all products
pub async fn list_doces(State(state): State<SharedState>) -> ApiResult<Json<Vec<Doce>>> {
    debug!("Listing doces");

    let doces = state.doces.list().await?;
    Ok(Json(doces))
}

/// Create a product. Presence of every field is checked before the database
/// is touched.
pub async fn create_doce(
    State(state): State<SharedState>,
    CreateDoceBody(payload): CreateDoceBody,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let doce = payload.ok_or_else(missing_fields_error)?.into_new_doce()?;
    debug!("Creating doce '{}'", doce.nome);

    state.doces.create(&doce).await?;

    info!("Doce '{}' created", doce.nome);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Doce cadastrado com sucesso!")),
    ))
}

/// Delete a product by id
pub async fn delete_doce(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    let affected = state.doces.delete(id).await?;

    info!("Deleted doce {} ({} rows)", id, affected);
    Ok(Json(MessageResponse::new("Doce excluído com sucesso!")))
}

/// Overwrite the stock quantity of a product
pub async fn update_estoque(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateEstoqueRequest>, AppError>,
) -> ApiResult<Json<MessageResponse>> {
    let affected = state.doces.update_stock(id, payload.quantidade).await?;

    info!(
        "Stock of doce {} set to {:?} ({} rows)",
        id, payload.quantidade, affected
    );
    Ok(Json(MessageResponse::new("Estoque atualizado com sucesso!")))
}
