use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use serde_json::json;

use prodboard_core::ProductId;
use prodboard_dashboard::{ApiError, HttpProductsApi, InMemoryProductsApi, ProductsApi};
use prodboard_products::{CreateProductDto, UpdateProductDto};

#[derive(Clone)]
struct Backend {
    catalog: InMemoryProductsApi,
    token: Option<String>,
}

impl Backend {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let Some(token) = &self.token else {
            return Ok(());
        };
        let expected = format!("Bearer {token}");
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if presented == Some(expected.as_str()) {
            Ok(())
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthorized", "message": "missing or invalid token" })),
            )
                .into_response())
        }
    }
}

fn failure(err: ApiError) -> Response {
    let (status, code) = match &err {
        ApiError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    };
    (status, Json(json!({ "error": code, "message": err.to_string() }))).into_response()
}

async fn list(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(resp) = backend.authorize(&headers) {
        return resp;
    }
    match backend.catalog.list().await {
        Ok(products) => Json(products).into_response(),
        Err(err) => failure(err),
    }
}

async fn create(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(dto): Json<CreateProductDto>,
) -> Response {
    if let Err(resp) = backend.authorize(&headers) {
        return resp;
    }
    match backend.catalog.create(&dto).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(err) => failure(err),
    }
}

async fn update(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(dto): Json<UpdateProductDto>,
) -> Response {
    if let Err(resp) = backend.authorize(&headers) {
        return resp;
    }
    match backend.catalog.update(ProductId::new(id), &dto).await {
        Ok(product) => Json(product).into_response(),
        Err(err) => failure(err),
    }
}

async fn remove(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    if let Err(resp) = backend.authorize(&headers) {
        return resp;
    }
    match backend.catalog.delete(ProductId::new(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => failure(err),
    }
}

fn catalog_router(backend: Backend) -> Router {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/:id", axum::routing::put(update).delete(remove))
        .with_state(backend)
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn catalog(catalog: InMemoryProductsApi, token: Option<&str>) -> Self {
        Self::spawn(catalog_router(Backend {
            catalog,
            token: token.map(str::to_string),
        }))
        .await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn crud_lifecycle_over_http() {
    let catalog = InMemoryProductsApi::new();
    let srv = TestServer::catalog(catalog.clone(), None).await;
    let api = HttpProductsApi::new(format!("{}/", srv.base_url));

    assert!(api.list().await.unwrap().is_empty());

    let created = api
        .create(&CreateProductDto::new("Desk Lamp", "LMP-001", 3499))
        .await
        .unwrap();
    assert_eq!(created.name, "Desk Lamp");
    assert_eq!(catalog.len(), 1);

    let updated = api
        .update(
            created.id,
            &UpdateProductDto {
                price: Some(2999),
                ..UpdateProductDto::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, 2999);
    assert_eq!(updated.name, "Desk Lamp");

    let listed = api.list().await.unwrap();
    assert_eq!(listed, vec![updated]);

    api.delete(created.id).await.unwrap();
    assert!(api.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let srv = TestServer::catalog(InMemoryProductsApi::demo(), Some("s3cret")).await;

    let authed = HttpProductsApi::with_token(srv.base_url.clone(), "s3cret");
    assert_eq!(authed.list().await.unwrap().len(), 10);

    let anonymous = HttpProductsApi::new(srv.base_url.clone());
    match anonymous.list().await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "missing or invalid token");
        }
        other => panic!("Expected 401 status error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_product_maps_to_not_found() {
    let srv = TestServer::catalog(InMemoryProductsApi::new(), None).await;
    let api = HttpProductsApi::new(srv.base_url.clone());

    assert!(matches!(api.delete(ProductId::new(3)).await, Err(ApiError::NotFound)));
    assert!(matches!(
        api.update(ProductId::new(3), &UpdateProductDto::default()).await,
        Err(ApiError::NotFound)
    ));
}

#[tokio::test]
async fn rejected_payload_maps_to_validation() {
    let srv = TestServer::catalog(InMemoryProductsApi::new(), None).await;
    let api = HttpProductsApi::new(srv.base_url.clone());

    match api.create(&CreateProductDto::new("   ", "SKU-1", 100)).await {
        Err(ApiError::Validation(message)) => assert!(!message.is_empty()),
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_text_error_body_is_kept() {
    let app = Router::new().route(
        "/products",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance window") }),
    );
    let srv = TestServer::spawn(app).await;
    let api = HttpProductsApi::new(srv.base_url.clone());

    match api.list().await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance window");
        }
        other => panic!("Expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let app = Router::new().route("/products", get(|| async { Json(json!({ "items": [] })) }));
    let srv = TestServer::spawn(app).await;
    let api = HttpProductsApi::new(srv.base_url.clone());

    assert!(matches!(api.list().await, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpProductsApi::new(format!("http://{}", addr));
    assert!(matches!(api.list().await, Err(ApiError::Network(_))));
}
