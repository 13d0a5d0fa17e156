// End-to-end behavior of the data access layer against a live HTTP fixture:
// remote-first CRUD, and the local fallback path when the remote is down,
// erroring, or answering with either of its historical payload shapes.
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use stockroom_client::store::local::DATA_FILE;
use stockroom_client::{ClientConfig, FallbackStore, ProductStore, StoreError};
use stockroom_model::{Product, ProductInput, ProductPatch};
use tempfile::TempDir;
use tokio::sync::RwLock;

#[derive(Clone)]
struct ApiState {
    products: Arc<RwLock<Vec<Product>>>,
    // The real backend answered bare arrays in one era and wrapped objects in
    // another; the fixture can serve both.
    wrap: bool,
}

async fn list_products(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let products = state.products.read().await.clone();
    if state.wrap {
        Json(serde_json::json!({ "products": products }))
    } else {
        Json(serde_json::json!(products))
    }
}

async fn create_product(
    State(state): State<ApiState>,
    Json(input): Json<ProductInput>,
) -> (StatusCode, Json<serde_json::Value>) {
    let product = Product::from_input(input, Utc::now());
    state.products.write().await.insert(0, product.clone());
    let body = if state.wrap {
        serde_json::json!({ "product": product })
    } else {
        serde_json::json!(product)
    };
    (StatusCode::CREATED, Json(body))
}

async fn update_product(
    Path(id): Path<String>,
    State(state): State<ApiState>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut products = state.products.write().await;
    let product = products
        .iter_mut()
        .find(|product| product.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = patch.name {
        product.name = name;
    }
    if let Some(price) = patch.price {
        product.price = price;
    }
    if let Some(stock) = patch.stock {
        product.stock = stock;
    }
    product.updated_at = Some(Utc::now());
    Ok(Json(serde_json::json!(product.clone())))
}

async fn delete_product(Path(id): Path<String>, State(state): State<ApiState>) -> StatusCode {
    state
        .products
        .write()
        .await
        .retain(|product| product.id != id);
    StatusCode::NO_CONTENT
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "uptime": 12.5, "db": "connected" }))
}

async fn spawn_api(wrap: bool) -> (SocketAddr, ApiState) {
    let state = ApiState {
        products: Arc::new(RwLock::new(Vec::new())),
        wrap,
    };
    let app = Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            axum::routing::patch(update_product).delete(delete_product),
        )
        .route("/api/health", get(health))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });
    (addr, state)
}

// Fixture whose every route answers 500, for the non-success status path.
async fn spawn_failing_api() -> SocketAddr {
    let app = Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });
    addr
}

// An address nobody listens on: bind, read the port, drop the listener.
async fn unreachable_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    listener.local_addr().expect("local addr")
}

fn config_for(addr: SocketAddr, data_dir: &TempDir) -> ClientConfig {
    ClientConfig {
        api_base: format!("http://{addr}/api"),
        data_dir: data_dir.path().to_path_buf(),
        request_timeout_ms: 1_000,
    }
}

fn input(name: &str, sku: &str, price: f64, stock: u32) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        sku: sku.to_string(),
        price,
        stock,
        category: None,
    }
}

#[tokio::test]
async fn remote_crud_round_trip_leaves_local_store_untouched() {
    let (addr, _state) = spawn_api(false).await;
    let data_dir = TempDir::new().expect("temp dir");
    let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");

    let created = store
        .create_product(input("Dock", "DK-0001", 120.0, 4))
        .await
        .expect("create");

    let (products, backend) = store.list_products_traced().await.expect("list");
    assert_eq!(backend, "remote");
    assert_eq!(products, vec![created.clone()]);

    let updated = store
        .update_product(
            &created.id,
            ProductPatch {
                stock: Some(9),
                ..ProductPatch::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.stock, 9);
    assert!(updated.updated_at.is_some());

    let confirmed = store.delete_product(&created.id).await.expect("delete");
    assert_eq!(confirmed, created.id);
    assert!(store.list_products().await.expect("list").is_empty());

    // The remote served everything, so the fallback file must not exist.
    assert!(!data_dir.path().join(DATA_FILE).exists());
}

#[tokio::test]
async fn wrapped_and_bare_list_payloads_normalize_identically() {
    for wrap in [false, true] {
        let (addr, state) = spawn_api(wrap).await;
        let seeded = Product::from_input(input("Dock", "DK-0001", 120.0, 4), Utc::now());
        state.products.write().await.push(seeded.clone());

        let data_dir = TempDir::new().expect("temp dir");
        let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");
        let products = store.list_products().await.expect("list");
        assert_eq!(products, vec![seeded], "wrap = {wrap}");
    }
}

#[tokio::test]
async fn wrapped_create_payload_normalizes() {
    let (addr, _state) = spawn_api(true).await;
    let data_dir = TempDir::new().expect("temp dir");
    let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");

    let created = store
        .create_product(input("Dock", "DK-0001", 120.0, 4))
        .await
        .expect("create");
    assert_eq!(created.sku, "DK-0001");
    assert!(!created.id.is_empty());
}

#[tokio::test]
async fn unreachable_remote_seeds_local_and_does_not_reseed() {
    let addr = unreachable_addr().await;
    let data_dir = TempDir::new().expect("temp dir");
    let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");

    let (products, backend) = store.list_products_traced().await.expect("list");
    assert_eq!(backend, "local");
    assert_eq!(products.len(), 3);
    for product in &products {
        assert!(!product.id.is_empty());
    }

    let (again, _) = store.list_products_traced().await.expect("list");
    let ids: Vec<_> = products.iter().map(|product| &product.id).collect();
    let same: Vec<_> = again.iter().map(|product| &product.id).collect();
    assert_eq!(ids, same);
}

#[tokio::test]
async fn erroring_remote_falls_back_like_an_unreachable_one() {
    let addr = spawn_failing_api().await;
    let data_dir = TempDir::new().expect("temp dir");
    let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");

    let (products, backend) = store.list_products_traced().await.expect("list");
    assert_eq!(backend, "local");
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn fallback_create_then_list_round_trips() {
    let addr = unreachable_addr().await;
    let data_dir = TempDir::new().expect("temp dir");
    let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");

    let created = store
        .create_product(input("Dock", "DK-0001", 120.0, 4))
        .await
        .expect("create");

    let products = store.list_products().await.expect("list");
    let found = products
        .iter()
        .find(|product| product.id == created.id)
        .expect("created product listed");
    assert_eq!(found, &created);
}

#[tokio::test]
async fn fallback_update_of_missing_id_surfaces_not_found() {
    let addr = unreachable_addr().await;
    let data_dir = TempDir::new().expect("temp dir");
    let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");
    let before = store.list_products().await.expect("seed");

    let err = store
        .update_product("no-such-id", ProductPatch::default())
        .await
        .expect_err("missing id");
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(store.list_products().await.expect("list"), before);
}

#[tokio::test]
async fn fallback_delete_of_missing_id_is_a_noop() {
    let addr = unreachable_addr().await;
    let data_dir = TempDir::new().expect("temp dir");
    let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");
    let before = store.list_products().await.expect("seed");

    let confirmed = store.delete_product("no-such-id").await.expect("noop");
    assert_eq!(confirmed, "no-such-id");
    assert_eq!(store.list_products().await.expect("list"), before);
}

#[tokio::test]
async fn malformed_local_payload_reads_as_empty_list() {
    let addr = unreachable_addr().await;
    let data_dir = TempDir::new().expect("temp dir");
    std::fs::write(data_dir.path().join(DATA_FILE), b"{\"not\": \"an array\"}")
        .expect("corrupt file");

    let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");
    let products = store.list_products().await.expect("list");
    assert!(products.is_empty());
}

#[tokio::test]
async fn health_prefers_remote_and_falls_back_to_local() {
    let (addr, _state) = spawn_api(false).await;
    let data_dir = TempDir::new().expect("temp dir");
    let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");
    let report = store.health().await.expect("health");
    assert_eq!(report.db, "connected");

    let addr = unreachable_addr().await;
    let store = FallbackStore::new(&config_for(addr, &data_dir)).expect("store");
    let report = store.health().await.expect("health");
    assert_eq!(report.db, "local");
}
