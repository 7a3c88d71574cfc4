//! SQL query constants
//!
//! Contains all SQL statements used by the application. Every value travels
//! as a `$n` parameter.

pub const PING: &str = "SELECT 1";

// doces

pub const LIST_DOCES: &str = r#"
    SELECT id, nome, tipo, preco, quantidade
    FROM doces
"#;

pub const INSERT_DOCE: &str = r#"
    INSERT INTO doces (nome, tipo, preco, quantidade)
    VALUES ($1, $2, $3, $4)
"#;

pub const DELETE_DOCE: &str = "DELETE FROM doces WHERE id = $1";

pub const UPDATE_ESTOQUE: &str = "UPDATE doces SET quantidade = $1 WHERE id = $2";

// clientes

pub const LIST_CLIENTES: &str = r#"
    SELECT id, nome, telefone, endereco, cpf
    FROM clientes
"#;

pub const INSERT_CLIENTE: &str = r#"
    INSERT INTO clientes (nome, telefone, endereco, cpf)
    VALUES ($1, $2, $3, $4)
    RETURNING id
"#;

pub const UPDATE_CLIENTE: &str = r#"
    UPDATE clientes
    SET nome = $1, telefone = $2, endereco = $3, cpf = $4
    WHERE id = $5
"#;

pub const DELETE_CLIENTE: &str = "DELETE FROM clientes WHERE id = $1";

// pedidos

pub const LIST_PEDIDOS: &str = r#"
    SELECT id, cliente, doce, quantidade, data_pedido
    FROM pedidos
"#;

/// `data_pedido` comes from the database clock, never from the request.
pub const INSERT_PEDIDO: &str = r#"
    INSERT INTO pedidos (cliente, doce, quantidade, data_pedido)
    VALUES ($1, $2, $3, NOW())
    RETURNING id
"#;

pub const UPDATE_PEDIDO: &str = r#"
    UPDATE pedidos
    SET cliente = $1, doce = $2, quantidade = $3
    WHERE id = $4
"#;

pub const DELETE_PEDIDO: &str = "DELETE FROM pedidos WHERE id = $1";
