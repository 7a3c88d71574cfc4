//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod clientes;
mod doces;
mod pedidos;

use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    http::{header, Method},
    routing::{delete, get, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

pub const LIVENESS_TEXT: &str = "🍭 API DOCES funcionando!";

const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    let cors = build_cors_layer(settings);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    Router::new()
        // Liveness
        .route("/", get(root))

        // Doces
        .route("/doces", get(doces::list_doces).post(doces::create_doce))
        .route("/doces/{id}", delete(doces::delete_doce))
        .route("/doces/{id}/estoque", put(doces::update_estoque))

        // Clientes
        .route("/clientes", get(clientes::list_clientes).post(clientes::create_cliente))
        .route(
            "/clientes/{id}",
            put(clientes::update_cliente).delete(clientes::delete_cliente),
        )

        // Pedidos
        .route("/pedidos", get(pedidos::list_pedidos).post(pedidos::create_pedido))
        .route(
            "/pedidos/{id}",
            put(pedidos::update_pedido).delete(pedidos::delete_pedido),
        )

        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Liveness endpoint
async fn root() -> &'static str {
    LIVENESS_TEXT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::create_pool;
    use crate::error::{
        MSG_CONNECTION_REFUSED, MSG_MISSING_FIELDS, MSG_UNKNOWN_DATABASE, MSG_UNKNOWN_TABLE,
    };
    use crate::state::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router_for(database: DatabaseConfig) -> Router {
        let pool = create_pool(&database).unwrap();
        let settings = Settings {
            database,
            ..Settings::default()
        };
        create_router(Arc::new(AppState::new(pool)), &settings)
    }

    /// Nothing listens on port 1, so every request that needs the database
    /// sees a refused connection.
    fn unreachable_router() -> Router {
        router_for(DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..DatabaseConfig::default()
        })
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap_or_else(|err| panic!("router request failed: {err}"))
    }

    async fn send_json(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = send(router, method, uri, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|err| panic!("response body is not JSON: {err}"));
        (status, value)
    }

    /// Send a raw body, optionally without a content type
    async fn send_raw(
        router: &Router,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }

        let response = router
            .clone()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap_or_else(|err| panic!("router request failed: {err}"));
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|err| panic!("response body is not JSON: {err}"));
        (status, value)
    }

    fn brigadeiro() -> Value {
        json!({ "nome": "Brigadeiro", "tipo": "Chocolate", "preco": 3.5, "quantidade": 10 })
    }

    fn database_calls() -> Vec<(Method, &'static str, Option<Value>)> {
        let cliente = json!({ "nome": "Ana", "telefone": "1199", "endereco": "Rua A", "cpf": "123" });
        let pedido = json!({ "cliente": "Ana", "doce": "Brigadeiro", "quantidade": 2 });

        vec![
            (Method::GET, "/doces", None),
            (Method::POST, "/doces", Some(brigadeiro())),
            (Method::DELETE, "/doces/1", None),
            (Method::PUT, "/doces/1/estoque", Some(json!({ "quantidade": 20 }))),
            (Method::GET, "/clientes", None),
            (Method::POST, "/clientes", Some(cliente.clone())),
            (Method::PUT, "/clientes/1", Some(cliente)),
            (Method::DELETE, "/clientes/1", None),
            (Method::GET, "/pedidos", None),
            (Method::POST, "/pedidos", Some(pedido.clone())),
            (Method::PUT, "/pedidos/1", Some(pedido)),
            (Method::DELETE, "/pedidos/1", None),
        ]
    }

    #[tokio::test]
    async fn test_root_is_plain_text_without_database() {
        let router = unreachable_router();
        let response = send(&router, Method::GET, "/", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"));

        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), LIVENESS_TEXT);
    }

    #[tokio::test]
    async fn test_unreachable_database_maps_to_400_everywhere() {
        let router = unreachable_router();

        for (method, uri, body) in database_calls() {
            let (status, value) = send_json(&router, method.clone(), uri, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
            assert_eq!(value, json!({ "mensagem": MSG_CONNECTION_REFUSED }), "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_missing_product_fields_rejected_before_database() {
        let router = unreachable_router();

        for field in ["nome", "tipo", "preco", "quantidade"] {
            let mut body = brigadeiro();
            body.as_object_mut().unwrap().remove(field);

            let (status, value) = send_json(&router, Method::POST, "/doces", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "without {field}");
            assert_eq!(value, json!({ "mensagem": MSG_MISSING_FIELDS }), "without {field}");
        }
    }

    #[tokio::test]
    async fn test_absent_or_null_product_body_is_missing_fields() {
        let router = unreachable_router();
        let cases = [
            (None, ""),
            (Some("application/json"), ""),
            (Some("application/json"), "  \n"),
            (Some("application/json"), "null"),
            (None, "null"),
            (Some("application/json"), "{}"),
        ];

        for (content_type, body) in cases {
            let (status, value) =
                send_raw(&router, Method::POST, "/doces", content_type, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{content_type:?} {body:?}");
            assert_eq!(value, json!({ "mensagem": MSG_MISSING_FIELDS }), "{content_type:?} {body:?}");
        }
    }

    #[tokio::test]
    async fn test_whole_float_quantity_reaches_database() {
        let router = unreachable_router();
        let body = json!({ "nome": "B", "tipo": "C", "preco": 3.5, "quantidade": 10.0 });

        let (status, value) = send_json(&router, Method::POST, "/doces", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["mensagem"], MSG_CONNECTION_REFUSED);

        let (status, value) = send_json(
            &router,
            Method::PUT,
            "/doces/1/estoque",
            Some(json!({ "quantidade": 20.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["mensagem"], MSG_CONNECTION_REFUSED);
    }

    #[tokio::test]
    async fn test_undecodable_bodies_answer_with_mensagem() {
        let router = unreachable_router();
        let cases = [
            (Method::POST, "/doces", Some("application/json"), "{\"nome\":"),
            (Method::POST, "/doces", Some("application/json"), "{\"quantidade\": 2.5}"),
            (Method::POST, "/clientes", None, "{}"),
            (Method::POST, "/pedidos", Some("application/json"), "[1, 2]"),
            (Method::PUT, "/pedidos/1", Some("application/json"), "{\"quantidade\": \"dois\"}"),
            (Method::PUT, "/doces/1/estoque", Some("application/json"), "nao e json"),
        ];

        for (method, uri, content_type, body) in cases {
            let (status, value) = send_raw(&router, method.clone(), uri, content_type, body).await;
            assert!(status.is_client_error(), "{method} {uri} {body:?}: {status}");
            let mensagem = value["mensagem"].as_str().unwrap_or_default();
            assert!(!mensagem.is_empty(), "{method} {uri} {body:?}: {value}");
            assert_ne!(mensagem, MSG_CONNECTION_REFUSED, "{method} {uri} {body:?}");
        }
    }

    #[tokio::test]
    async fn test_customer_and_order_bodies_are_not_validated() {
        let router = unreachable_router();

        // An empty body goes straight to the database, which is down here
        for uri in ["/clientes", "/pedidos"] {
            let (status, value) = send_json(&router, Method::POST, uri, Some(json!({}))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(value["mensagem"], MSG_CONNECTION_REFUSED);
        }
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected() {
        let router = unreachable_router();
        let response = send(&router, Method::DELETE, "/doces/abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let router = unreachable_router();
        let response = send(&router, Method::GET, "/produtos", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let router = unreachable_router();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/doces")
            .header(header::ORIGIN, "http://loja.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        for method in ["GET", "POST", "PUT", "DELETE"] {
            assert!(methods.contains(method), "{methods}");
        }
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let router = unreachable_router();
        let response = send(&router, Method::GET, "/", None).await;
        assert!(response.headers().contains_key("x-request-id"));
    }

    // The tests below need a running PostgreSQL:
    //   TEST_DATABASE_URL=postgres://postgres@localhost/doces_test cargo test -- --ignored

    async fn live_router() -> Router {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
        let database = Settings::parse_database_url(&url).unwrap();

        let pool = create_pool(&database).unwrap();
        pool.get()
            .await
            .unwrap()
            .batch_execute(include_str!("../sql/schema.sql"))
            .await
            .unwrap();

        router_for(database)
    }

    async fn find_doce(router: &Router, nome: &str) -> Value {
        let (_, list) = send_json(router, Method::GET, "/doces", None).await;
        list.as_array()
            .unwrap()
            .iter()
            .filter(|d| d["nome"] == nome)
            .max_by_key(|d| d["id"].as_i64().unwrap())
            .cloned()
            .unwrap_or_else(|| panic!("doce {nome} not listed"))
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at TEST_DATABASE_URL"]
    async fn test_create_list_and_restock_doce() {
        let router = live_router().await;
        let nome = format!("Brigadeiro {}", chrono::Utc::now().timestamp_micros());
        let mut body = brigadeiro();
        body["nome"] = json!(nome);

        let (status, value) = send_json(&router, Method::POST, "/doces", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(value, json!({ "mensagem": "Doce cadastrado com sucesso!" }));

        let doce = find_doce(&router, &nome).await;
        assert_eq!(doce["tipo"], "Chocolate");
        assert_eq!(doce["preco"], 3.5);
        assert_eq!(doce["quantidade"], 10);

        let uri = format!("/doces/{}/estoque", doce["id"]);
        let (status, value) =
            send_json(&router, Method::PUT, &uri, Some(json!({ "quantidade": 20 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!({ "mensagem": "Estoque atualizado com sucesso!" }));
        assert_eq!(find_doce(&router, &nome).await["quantidade"], 20);

        let uri = format!("/doces/{}", doce["id"]);
        let (status, _) = send_json(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at TEST_DATABASE_URL"]
    async fn test_delete_missing_doce_still_succeeds() {
        let router = live_router().await;

        let (status, value) = send_json(&router, Method::DELETE, "/doces/2147483647", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!({ "mensagem": "Doce excluído com sucesso!" }));
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at TEST_DATABASE_URL"]
    async fn test_pedido_gets_server_timestamp() {
        let router = live_router().await;
        let before = chrono::Utc::now() - chrono::Duration::minutes(5);

        let body = json!({
            "cliente": "Ana",
            "doce": "Brigadeiro",
            "quantidade": 2,
            "data_pedido": "1999-01-01T00:00:00Z"
        });
        let (status, value) = send_json(&router, Method::POST, "/pedidos", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["mensagem"], "Pedido cadastrado com sucesso!");
        let id = value["id"].as_i64().expect("numeric id");

        let (_, list) = send_json(&router, Method::GET, "/pedidos", None).await;
        let pedido = list
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["id"].as_i64() == Some(id))
            .cloned()
            .unwrap();
        let stamped: chrono::DateTime<chrono::Utc> =
            pedido["data_pedido"].as_str().unwrap().parse().unwrap();
        assert!(stamped > before);
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at TEST_DATABASE_URL"]
    async fn test_cliente_crud_roundtrip() {
        let router = live_router().await;

        let body = json!({ "nome": "Ana", "telefone": "1199", "endereco": "Rua A", "cpf": "123" });
        let (status, value) = send_json(&router, Method::POST, "/clientes", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        let id = value["id"].as_i64().unwrap();

        let uri = format!("/clientes/{id}");
        let update = json!({ "nome": "Ana Maria", "telefone": null, "endereco": "Rua B", "cpf": "123" });
        let (status, value) = send_json(&router, Method::PUT, &uri, Some(update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!({ "mensagem": "Cliente atualizado com sucesso!" }));

        let (_, list) = send_json(&router, Method::GET, "/clientes", None).await;
        let cliente = list
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["id"].as_i64() == Some(id))
            .cloned()
            .unwrap();
        assert_eq!(cliente["nome"], "Ana Maria");
        assert_eq!(cliente["telefone"], Value::Null);

        let (status, _) = send_json(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at TEST_DATABASE_URL"]
    async fn test_missing_table_maps_to_400() {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
        let base = Settings::parse_database_url(&url).unwrap();
        let schema = format!("vazio_{}", chrono::Utc::now().timestamp_micros());

        let admin = create_pool(&base).unwrap();
        let client = admin.get().await.unwrap();
        client
            .batch_execute(&format!("CREATE SCHEMA {schema}"))
            .await
            .unwrap();

        let router = router_for(DatabaseConfig {
            schema: Some(schema.clone()),
            ..base
        });
        let listed = send_json(&router, Method::GET, "/doces", None).await;

        client
            .batch_execute(&format!("DROP SCHEMA {schema} CASCADE"))
            .await
            .unwrap();

        assert_eq!(listed, (StatusCode::BAD_REQUEST, json!({ "mensagem": MSG_UNKNOWN_TABLE })));
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at TEST_DATABASE_URL"]
    async fn test_unknown_database_maps_to_400() {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
        let database = DatabaseConfig {
            database: "banco_que_nao_existe".to_string(),
            ..Settings::parse_database_url(&url).unwrap()
        };
        let router = router_for(database);

        let (status, value) = send_json(&router, Method::GET, "/doces", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value, json!({ "mensagem": MSG_UNKNOWN_DATABASE }));
    }
}
