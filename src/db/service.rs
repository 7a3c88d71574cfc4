// Database services for doces, clientes and pedidos
//
// Each method checks one client out of the pool, runs exactly one statement
// and lets the client go back to the pool when it drops, on success or error.

use crate::db::queries;
use crate::error::AppError;
use crate::models::{Cliente, ClienteRequest, Doce, NewDoce, Pedido, PedidoRequest};
use deadpool_postgres::Pool;

// Service for the doces table
#[derive(Clone)]
pub struct DoceService {
    pool: Pool,
}

impl DoceService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Doce>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(queries::LIST_DOCES, &[]).await?;

        rows.iter()
            .map(|r| Doce::try_from(r).map_err(AppError::from))
            .collect()
    }

    pub async fn create(&self, doce: &NewDoce) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        client
            .execute(
                queries::INSERT_DOCE,
                &[&doce.nome, &doce.tipo, &doce.preco, &doce.quantidade],
            )
            .await?;
        Ok(())
    }

    // Unconditional: deleting a missing id is not an error
    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        Ok(client.execute(queries::DELETE_DOCE, &[&id]).await?)
    }

    pub async fn update_stock(&self, id: i32, quantidade: Option<i32>) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        Ok(client
            .execute(queries::UPDATE_ESTOQUE, &[&quantidade, &id])
            .await?)
    }
}

// Service for the clientes table
#[derive(Clone)]
pub struct ClienteService {
    pool: Pool,
}

impl ClienteService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Cliente>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(queries::LIST_CLIENTES, &[]).await?;

        rows.iter()
            .map(|r| Cliente::try_from(r).map_err(AppError::from))
            .collect()
    }

    // Returns the generated id
    pub async fn create(&self, cliente: &ClienteRequest) -> Result<i32, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                queries::INSERT_CLIENTE,
                &[&cliente.nome, &cliente.telefone, &cliente.endereco, &cliente.cpf],
            )
            .await?;
        Ok(row.try_get(0)?)
    }

    pub async fn update(&self, id: i32, cliente: &ClienteRequest) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        Ok(client
            .execute(
                queries::UPDATE_CLIENTE,
                &[
                    &cliente.nome,
                    &cliente.telefone,
                    &cliente.endereco,
                    &cliente.cpf,
                    &id,
                ],
            )
            .await?)
    }

    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        Ok(client.execute(queries::DELETE_CLIENTE, &[&id]).await?)
    }
}

// Service for the pedidos table
#[derive(Clone)]
pub struct PedidoService {
    pool: Pool,
}

impl PedidoService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Pedido>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(queries::LIST_PEDIDOS, &[]).await?;

        rows.iter()
            .map(|r| Pedido::try_from(r).map_err(AppError::from))
            .collect()
    }

    // Returns the generated id
    pub async fn create(&self, pedido: &PedidoRequest) -> Result<i32, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                queries::INSERT_PEDIDO,
                &[&pedido.cliente, &pedido.doce, &pedido.quantidade],
            )
            .await?;
        Ok(row.try_get(0)?)
    }

    pub async fn update(&self, id: i32, pedido: &PedidoRequest) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        Ok(client
            .execute(
                queries::UPDATE_PEDIDO,
                &[&pedido.cliente, &pedido.doce, &pedido.quantidade, &id],
            )
            .await?)
    }

    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        Ok(client.execute(queries::DELETE_PEDIDO, &[&id]).await?)
    }
}
