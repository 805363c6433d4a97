//! Integration tests for the catalog admin.
//!
//! Each test spawns two servers on ephemeral ports: an in-memory Catalog API
//! ([`FakeCatalogApi`]) and the admin router pointed at it. Tests drive the
//! admin over HTTP with `reqwest` and then inspect what the fake received.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use catalog_admin::{config::AdminConfig, routes, state::AppState};
use serde_json::Value;

/// A request received by the fake Catalog API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct Store {
    products: Vec<Value>,
    requests: Vec<RecordedRequest>,
    next_id: i64,
}

/// In-memory Catalog API speaking the `/api/v1/products` protocol.
#[derive(Debug, Clone, Default)]
pub struct FakeCatalogApi {
    store: Arc<Mutex<Store>>,
    fail_writes: Arc<AtomicBool>,
}

impl FakeCatalogApi {
    /// Seed the store. New numeric ids continue after the highest seeded one.
    #[must_use]
    pub fn with_products(products: Vec<Value>) -> Self {
        let next_id = products
            .iter()
            .filter_map(|product| product["id"].as_i64())
            .max()
            .unwrap_or(0)
            + 1;
        let api = Self::default();
        {
            let mut store = api.lock();
            store.products = products;
            store.next_id = next_id;
        }
        api
    }

    /// Make every create, update and delete answer 500.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn products(&self) -> Vec<Value> {
        self.lock().products.clone()
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests other than reads.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method != Method::GET)
            .collect()
    }

    #[allow(clippy::unwrap_used)]
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    fn record(&self, method: Method, path: String, query: Option<String>, body: Option<Value>) {
        self.lock().requests.push(RecordedRequest {
            method,
            path,
            query,
            body,
        });
    }

    fn failing(&self) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
    }

    fn router(self) -> Router {
        Router::new()
            .route(
                "/api/v1/products",
                get(list_products)
                    .post(create_product)
                    .delete(delete_products),
            )
            .route(
                "/api/v1/products/{id}",
                get(get_product).put(update_product),
            )
            .with_state(self)
    }
}

fn id_matches(product: &Value, id: &str) -> bool {
    match &product["id"] {
        Value::Number(n) => n.to_string() == id,
        Value::String(s) => s == id,
        _ => false,
    }
}

fn query_pairs(query: Option<&str>) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "catalog unavailable").into_response()
}

async fn list_products(State(api): State<FakeCatalogApi>, RawQuery(query): RawQuery) -> Response {
    api.record(Method::GET, "/api/v1/products".to_string(), query.clone(), None);

    let pairs = query_pairs(query.as_deref());
    let param = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.to_lowercase())
    };
    let name = param("name");
    let category = param("category");

    let products: Vec<Value> = api
        .products()
        .into_iter()
        .filter(|product| {
            name.as_ref().is_none_or(|name| {
                product["name"]
                    .as_str()
                    .is_some_and(|n| n.to_lowercase().contains(name.as_str()))
            })
        })
        .filter(|product| {
            category.as_ref().is_none_or(|category| {
                product["categories"].as_array().is_some_and(|categories| {
                    categories
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|c| c.to_lowercase() == *category)
                })
            })
        })
        .collect();

    Json(products).into_response()
}

async fn get_product(State(api): State<FakeCatalogApi>, Path(id): Path<String>) -> Response {
    api.record(Method::GET, format!("/api/v1/products/{id}"), None, None);

    match api.products().into_iter().find(|p| id_matches(p, &id)) {
        Some(product) => Json(product).into_response(),
        None => (StatusCode::NOT_FOUND, "product not found").into_response(),
    }
}

async fn create_product(State(api): State<FakeCatalogApi>, Json(body): Json<Value>) -> Response {
    api.record(
        Method::POST,
        "/api/v1/products".to_string(),
        None,
        Some(body.clone()),
    );
    if api.failing() {
        return server_error();
    }

    let mut product = body;
    {
        let mut store = api.lock();
        if product.get("id").is_none_or(Value::is_null) {
            product["id"] = Value::from(store.next_id);
            store.next_id += 1;
        }
        store.products.push(product.clone());
    }
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn update_product(
    State(api): State<FakeCatalogApi>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    api.record(
        Method::PUT,
        format!("/api/v1/products/{id}"),
        None,
        Some(body.clone()),
    );
    if api.failing() {
        return server_error();
    }

    let mut store = api.lock();
    match store.products.iter_mut().find(|p| id_matches(p, &id)) {
        Some(existing) => {
            let original_id = existing["id"].clone();
            *existing = body;
            existing["id"] = original_id;
            Json(existing.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "product not found").into_response(),
    }
}

async fn delete_products(State(api): State<FakeCatalogApi>, RawQuery(query): RawQuery) -> Response {
    api.record(
        Method::DELETE,
        "/api/v1/products".to_string(),
        query.clone(),
        None,
    );
    if api.failing() {
        return server_error();
    }

    let ids: Vec<String> = query_pairs(query.as_deref())
        .into_iter()
        .filter(|(key, _)| key == "ids")
        .map(|(_, value)| value)
        .collect();
    api.lock()
        .products
        .retain(|product| !ids.iter().any(|id| id_matches(product, id)));

    StatusCode::NO_CONTENT.into_response()
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });
    addr
}

/// Spawn an admin pointed at `catalog_url` and return its base URL.
///
/// # Panics
///
/// Panics if the admin cannot be configured or started.
pub async fn spawn_admin(catalog_url: &str) -> String {
    let config = AdminConfig::from_lookup(|key| {
        (key == "CATALOG_API_BASE_URL").then(|| catalog_url.to_string())
    })
    .expect("Failed to build admin config");
    let state = AppState::new(config).expect("Failed to build admin state");
    let addr = spawn(routes::app(state)).await;
    format!("http://{addr}")
}

/// A running admin wired to a running fake Catalog API.
#[derive(Debug)]
pub struct TestContext {
    pub catalog: FakeCatalogApi,
    pub admin_url: String,
    /// Client that does not follow redirects.
    pub client: reqwest::Client,
}

impl TestContext {
    /// Spawn both servers, seeding the catalog with `products`.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot be started.
    pub async fn spawn(products: Vec<Value>) -> Self {
        let catalog = FakeCatalogApi::with_products(products);
        let catalog_addr = spawn(catalog.clone().router()).await;

        let admin_url = spawn_admin(&format!("http://{catalog_addr}")).await;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            catalog,
            admin_url,
            client,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }
}
