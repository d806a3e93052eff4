//! Integration test support for MLK Shop.
//!
//! [`StubApi`] serves an in-memory imitation of the shop REST API on an
//! ephemeral local port, so the storefront client can be exercised end to end
//! without the real backend.
//!
//! # Stub Behaviour
//!
//! ```text
//! POST   /api/auth/login      admin/admin -> admin token "t1", bob/secret -> user token "t2"
//! POST   /api/auth/register   new usernames get a user token, taken names 409
//! GET    /api/product         403 while `forbid_catalog` is set
//! GET    /api/product/{id}    404 for unknown ids
//! POST   /api/product         admin token required (403 otherwise)
//! PUT    /api/product/{id}    admin token required
//! DELETE /api/product/{id}    admin token required
//! POST   /api/order           any token required (401 otherwise)
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mlk_shop_core::{Price, ProductId};
use mlk_shop_storefront::AppState;
use mlk_shop_storefront::config::StorefrontConfig;
use mlk_shop_storefront::models::{OrderRequest, Product};
use mlk_shop_storefront::storage::{KeyValueStore, MemoryStore};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

/// Bearer token issued to the admin account.
pub const ADMIN_TOKEN: &str = "t1";
/// Bearer token issued to the regular `bob` account.
pub const USER_TOKEN: &str = "t2";

// =============================================================================
// StubApi
// =============================================================================

/// A running stub of the shop API. Shuts down when dropped.
pub struct StubApi {
    addr: SocketAddr,
    state: Arc<StubState>,
    _shutdown: oneshot::Sender<()>,
}

#[derive(Default)]
struct StubState {
    products: Mutex<Vec<Product>>,
    orders: Mutex<Vec<OrderRequest>>,
    users: Mutex<Vec<String>>,
    authorization: Mutex<Vec<Option<String>>>,
    requests: AtomicUsize,
    next_id: AtomicUsize,
    forbid_catalog: AtomicBool,
}

impl StubState {
    fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the request and remember its `Authorization` header.
    fn record(&self, headers: &HeaderMap) -> Option<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Self::lock(&self.authorization).push(auth.clone());
        auth
    }
}

impl StubApi {
    /// Start the stub seeded with `products`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    #[allow(clippy::expect_used)]
    pub async fn start(products: Vec<Product>) -> Self {
        let state = Arc::new(StubState {
            next_id: AtomicUsize::new(products.len() + 1),
            products: Mutex::new(products),
            users: Mutex::new(vec!["admin".to_string(), "bob".to_string()]),
            ..StubState::default()
        });

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/product", get(list_products).post(create_product))
            .route(
                "/api/product/{id}",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route("/api/order", post(place_order))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub API");
        let addr = listener.local_addr().expect("Stub API has no address");

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await;
        });

        Self {
            addr,
            state,
            _shutdown: tx,
        }
    }

    /// The API base URL to configure the client with.
    ///
    /// # Panics
    ///
    /// Never in practice; the address is always a valid URL.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr)).expect("stub URL is valid")
    }

    /// A storefront config pointing at this stub.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig::new(self.base_url())
    }

    /// A fresh application over in-memory storage.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn app(&self) -> (AppState, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        let shared: Arc<dyn KeyValueStore> = storage.clone();
        let app = AppState::new(self.config(), shared).expect("app state");
        (app, storage)
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// `Authorization` header of every request, in arrival order.
    #[must_use]
    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        StubState::lock(&self.state.authorization).clone()
    }

    /// Orders received so far.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderRequest> {
        StubState::lock(&self.state.orders).clone()
    }

    /// Current catalog contents.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        StubState::lock(&self.state.products).clone()
    }

    /// Make `GET /product` answer 403, as for an expired session.
    pub fn forbid_catalog(&self, forbid: bool) {
        self.state.forbid_catalog.store(forbid, Ordering::SeqCst);
    }
}

/// A catalog product with an id and a price in cents.
///
/// # Panics
///
/// Panics if `cents` is negative.
#[must_use]
#[allow(clippy::expect_used)]
pub fn product(id: &str, name: &str, cents: i64) -> Product {
    let price = Price::from_cents(cents).expect("non-negative price");
    Product::new(format!("SKU-{id}"), name, price).with_id(id)
}

// =============================================================================
// Handlers
// =============================================================================

type Shared = State<Arc<StubState>>;

fn error(status: StatusCode, message: &str) -> Response {
    (status, message.to_string()).into_response()
}

fn is_admin(auth: Option<&str>) -> bool {
    auth.and_then(|a| a.strip_prefix("Bearer ")) == Some(ADMIN_TOKEN)
}

async fn login(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record(&headers);
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (username, password) {
        ("admin", "admin") => {
            Json(json!({"username": "admin", "role": "admin", "token": ADMIN_TOKEN}))
                .into_response()
        }
        ("bob", "secret") => Json(json!({
            "username": "bob",
            "email": "bob@example.com",
            "role": "user",
            "token": USER_TOKEN
        }))
        .into_response(),
        _ => error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn register(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record(&headers);
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if body["password"] != body["confirmPassword"] {
        return error(StatusCode::BAD_REQUEST, "Passwords do not match");
    }

    let mut users = StubState::lock(&state.users);
    if users.contains(&username) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "Username already taken"})),
        )
            .into_response();
    }
    users.push(username.clone());
    Json(json!({
        "username": username,
        "email": email,
        "role": "user",
        "token": format!("token-{username}")
    }))
    .into_response()
}

async fn list_products(State(state): Shared, headers: HeaderMap) -> Response {
    state.record(&headers);
    if state.forbid_catalog.load(Ordering::SeqCst) {
        return error(StatusCode::FORBIDDEN, "Forbidden");
    }
    Json(StubState::lock(&state.products).clone()).into_response()
}

async fn get_product(State(state): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    state.record(&headers);
    let id = ProductId::from(id);
    StubState::lock(&state.products)
        .iter()
        .find(|p| p.id.as_ref() == Some(&id))
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "Product not found"),
            |p| Json(p.clone()).into_response(),
        )
}

async fn create_product(
    State(state): Shared,
    headers: HeaderMap,
    Json(mut product): Json<Product>,
) -> Response {
    let auth = state.record(&headers);
    if !is_admin(auth.as_deref()) {
        return error(StatusCode::FORBIDDEN, "Admin access required");
    }
    let n = state.next_id.fetch_add(1, Ordering::SeqCst);
    product.id = Some(ProductId::new(format!("p{n}")));
    StubState::lock(&state.products).push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn update_product(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut product): Json<Product>,
) -> Response {
    let auth = state.record(&headers);
    if !is_admin(auth.as_deref()) {
        return error(StatusCode::FORBIDDEN, "Admin access required");
    }
    let id = ProductId::from(id);
    let mut products = StubState::lock(&state.products);
    let Some(slot) = products.iter_mut().find(|p| p.id.as_ref() == Some(&id)) else {
        return error(StatusCode::NOT_FOUND, "Product not found");
    };
    product.id = Some(id);
    *slot = product.clone();
    Json(product).into_response()
}

async fn delete_product(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let auth = state.record(&headers);
    if !is_admin(auth.as_deref()) {
        return error(StatusCode::FORBIDDEN, "Admin access required");
    }
    let id = ProductId::from(id);
    let mut products = StubState::lock(&state.products);
    let before = products.len();
    products.retain(|p| p.id.as_ref() != Some(&id));
    if products.len() == before {
        return error(StatusCode::NOT_FOUND, "Product not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn place_order(
    State(state): Shared,
    headers: HeaderMap,
    Json(order): Json<OrderRequest>,
) -> Response {
    if state.record(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    StubState::lock(&state.orders).push(order);
    "Order Placed Successfully".into_response()
}
