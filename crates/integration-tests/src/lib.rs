//! Integration test harness for Wildmint.
//!
//! [`StubShop`] is an in-process `axum` server speaking the commerce
//! API's wire surface: bearer-token auth, `{"message"}` error bodies,
//! decimal-string money, bare-array and `{items, total_pages}` listing
//! shapes, multipart product creation. Tests drive the real
//! [`ApiClient`] and the view-state controllers against it over
//! loopback HTTP.
//!
//! The stub is single-tenant: one shared cart and order book, which is
//! all the tests need. Every request is counted per route, and any
//! route can be scripted to fail exactly once, so tests can assert
//! fetch counts and exercise rollback paths.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{MatchedPath, Multipart, Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use wildmint_client::{
    ApiClient, ApiConfig, CartLine, InMemorySessionStore, Order, OrderItem, Product,
    ProductSnapshot, SessionStore,
};
use wildmint_core::{
    CartLineId, CurrencyCode, Email, Money, OrderId, OrderStatus, PaymentMethod, ProductId,
};

/// Seeded buyer credentials.
pub const BUYER_EMAIL: &str = "shopper@example.com";
pub const BUYER_PASSWORD: &str = "hunter2!";

/// Seeded admin credentials.
pub const ADMIN_EMAIL: &str = "admin@wildmint.shop";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Listing page size served by the stub.
pub const PER_PAGE: usize = 3;

/// Installs a `tracing` subscriber for test runs, honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

// =============================================================================
// State
// =============================================================================

struct StubUser {
    id: i64,
    name: String,
    email: String,
    password: String,
    is_admin: bool,
}

#[derive(Default)]
struct ShopState {
    users: Mutex<Vec<StubUser>>,
    tokens: Mutex<HashMap<String, i64>>,
    products: Mutex<Vec<Product>>,
    cart: Mutex<Vec<CartLine>>,
    orders: Mutex<Vec<Order>>,
    next_id: AtomicI64,
    hits: Mutex<HashMap<String, usize>>,
    queries: Mutex<HashMap<String, HashMap<String, String>>>,
    failures: Mutex<HashMap<String, (u16, String)>>,
    analytics_malformed: AtomicBool,
    last_upload: Mutex<Option<(String, usize)>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ShopState {
    fn mint_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn mint_token(&self, user_id: i64) -> String {
        let token = format!("wildmint-test-token-{}", self.mint_id());
        locked(&self.tokens).insert(token.clone(), user_id);
        token
    }

    fn user_for_bearer(&self, headers: &HeaderMap) -> Option<i64> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?
            .to_string();
        locked(&self.tokens).get(&token).copied()
    }
}

// =============================================================================
// Handle
// =============================================================================

/// An in-process stub commerce API bound to a loopback port.
pub struct StubShop {
    addr: SocketAddr,
    state: Arc<ShopState>,
    server: JoinHandle<()>,
}

impl StubShop {
    /// Binds the stub to an ephemeral port and starts serving.
    pub async fn spawn() -> Self {
        init_tracing();
        let state = Arc::new(ShopState::default());
        let app = router(Arc::clone(&state));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub shop");
        });
        Self {
            addr,
            state,
            server,
        }
    }

    /// [`Self::spawn`] plus a buyer, an admin, and a small catalog.
    pub async fn spawn_seeded() -> Self {
        let shop = Self::spawn().await;
        shop.seed_user("Mint Shopper", BUYER_EMAIL, BUYER_PASSWORD, false);
        shop.seed_user("Wildmint Admin", ADMIN_EMAIL, ADMIN_PASSWORD, true);
        shop.seed_product("Mint Tea", "Wildmint", "Tea", 450);
        shop.seed_product("Spearmint Soap", "Wildmint", "Soap", 900);
        shop.seed_product("Peppermint Oil", "Meadow", "Oil", 1250);
        shop.seed_product("Mint Candle", "Meadow", "Home", 1600);
        shop
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A fresh client with an in-memory session store.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        self.client_with_store(Arc::new(InMemorySessionStore::new()))
    }

    /// A client backed by the given store, for session persistence tests.
    #[must_use]
    pub fn client_with_store(&self, store: Arc<dyn SessionStore>) -> ApiClient {
        let config = ApiConfig::for_base_url(self.base_url().parse().expect("stub base url"));
        ApiClient::new(&config, store).expect("build api client")
    }

    /// A client already signed in as the seeded buyer.
    pub async fn buyer_client(&self) -> ApiClient {
        let api = self.client();
        let email = Email::parse(BUYER_EMAIL).expect("buyer email");
        api.login(&email, BUYER_PASSWORD).await.expect("buyer login");
        api
    }

    /// A client already signed in as the seeded admin.
    pub async fn admin_client(&self) -> ApiClient {
        let api = self.client();
        let email = Email::parse(ADMIN_EMAIL).expect("admin email");
        api.login(&email, ADMIN_PASSWORD).await.expect("admin login");
        api
    }

    // -------------------------------------------------------------------------
    // Seeding
    // -------------------------------------------------------------------------

    pub fn seed_user(&self, name: &str, email: &str, password: &str, is_admin: bool) {
        let id = self.state.mint_id();
        locked(&self.state.users).push(StubUser {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            is_admin,
        });
    }

    pub fn seed_product(&self, name: &str, brand: &str, category: &str, cents: i64) -> ProductId {
        let id = ProductId::new(self.state.mint_id());
        locked(&self.state.products).push(Product {
            id,
            name: name.to_string(),
            description: format!("{name} from the Wildmint collection"),
            brand: brand.to_string(),
            category: category.to_string(),
            price: Money::new(Decimal::new(cents, 2), CurrencyCode::USD),
            image_path: format!("/images/{id}.jpg"),
            featured: false,
        });
        id
    }

    pub fn seed_order(&self, status: OrderStatus, method: PaymentMethod, cents: i64) -> OrderId {
        let id = OrderId::new(self.state.mint_id());
        locked(&self.state.orders).push(Order {
            id,
            status,
            payment_method: method,
            full_name: "Mint Shopper".to_string(),
            shipping_address: "1 Garden Way".to_string(),
            items: Vec::new(),
            total: Money::new(Decimal::new(cents, 2), CurrencyCode::USD),
            placed_at: Utc::now(),
        });
        id
    }

    // -------------------------------------------------------------------------
    // Scripting and introspection
    // -------------------------------------------------------------------------

    /// Makes the next request to a route fail with the given status and
    /// message. `route` is `"METHOD /template"`, e.g. `"PUT /cart/{id}"`.
    pub fn fail_once(&self, route: &str, status: u16, message: &str) {
        locked(&self.state.failures).insert(route.to_string(), (status, message.to_string()));
    }

    /// Serves structurally wrong analytics payloads until turned off.
    pub fn set_analytics_malformed(&self, malformed: bool) {
        self.state
            .analytics_malformed
            .store(malformed, Ordering::Relaxed);
    }

    /// How many requests a route has received.
    #[must_use]
    pub fn hits(&self, route: &str) -> usize {
        locked(&self.state.hits).get(route).copied().unwrap_or(0)
    }

    /// The query parameters of the most recent request to a route.
    #[must_use]
    pub fn last_query(&self, route: &str) -> Option<HashMap<String, String>> {
        locked(&self.state.queries).get(route).cloned()
    }

    /// The server-side cart as the stub holds it.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLine> {
        locked(&self.state.cart).clone()
    }

    #[must_use]
    pub fn order_status(&self, order_id: OrderId) -> Option<OrderStatus> {
        locked(&self.state.orders)
            .iter()
            .find(|o| o.id == order_id)
            .map(|o| o.status)
    }

    #[must_use]
    pub fn product_count(&self) -> usize {
        locked(&self.state.products).len()
    }

    /// Ids of the seeded catalog, in seed order.
    #[must_use]
    pub fn catalog_ids(&self) -> Vec<ProductId> {
        locked(&self.state.products).iter().map(|p| p.id).collect()
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        locked(&self.state.users).len()
    }

    /// File name and byte count of the most recent product image upload.
    #[must_use]
    pub fn last_upload(&self) -> Option<(String, usize)> {
        locked(&self.state.last_upload).clone()
    }
}

impl Drop for StubShop {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Router
// =============================================================================

fn router(state: Arc<ShopState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/current-authentication", get(current_authentication))
        .route("/cart", get(get_cart).post(add_to_cart))
        .route("/cart/{id}", put(update_cart_line).delete(delete_cart_line))
        .route("/orders", get(list_orders).post(place_order))
        .route("/orders/status/{id}", post(change_order_status))
        .route("/orders/cancel", post(cancel_order))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", delete(delete_product))
        .route("/analytics/sales-report", get(sales_report))
        .route("/analytics/revenue-statistics", get(revenue_statistics))
        .route("/analytics/product-performance", get(product_performance))
        .route("/download/file", get(download_file))
        .route("/stripe/checkout-url", get(stripe_checkout_url))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), track))
        .with_state(state)
}

/// Counts hits, records query parameters, and applies scripted failures.
async fn track(
    State(state): State<Arc<ShopState>>,
    matched: MatchedPath,
    request: Request,
    next: Next,
) -> Response {
    let key = format!("{} {}", request.method(), matched.as_str());
    *locked(&state.hits).entry(key.clone()).or_insert(0) += 1;

    let query: HashMap<String, String> = request
        .uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();
    locked(&state.queries).insert(key.clone(), query);

    if let Some((status, message)) = locked(&state.failures).remove(&key) {
        return error_response(status, &message);
    }
    next.run(request).await
}

fn error_response(status: u16, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "message": message }))).into_response()
}

fn require_auth(state: &ShopState, headers: &HeaderMap) -> Result<i64, Response> {
    state
        .user_for_bearer(headers)
        .ok_or_else(|| error_response(401, "Unauthenticated."))
}

// =============================================================================
// Auth handlers
// =============================================================================

async fn login(State(state): State<Arc<ShopState>>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    let user_id = locked(&state.users)
        .iter()
        .find(|u| u.email == email && u.password == password)
        .map(|u| u.id);
    match user_id {
        Some(id) => {
            let token = state.mint_token(id);
            Json(json!({ "token": token })).into_response()
        }
        None => error_response(401, "Invalid credentials."),
    }
}

async fn register(State(state): State<Arc<ShopState>>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if locked(&state.users).iter().any(|u| u.email == email) {
        return error_response(422, "Email already registered.");
    }
    let id = state.mint_id();
    locked(&state.users).push(StubUser {
        id,
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email,
        password: body["password"].as_str().unwrap_or_default().to_string(),
        is_admin: false,
    });
    (StatusCode::CREATED, Json(json!({ "message": "Registered." }))).into_response()
}

async fn logout(State(state): State<Arc<ShopState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    Json(json!({ "message": "Logged out." })).into_response()
}

async fn current_authentication(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
) -> Response {
    let user_id = match require_auth(&state, &headers) {
        Ok(id) => id,
        Err(denied) => return denied,
    };
    let users = locked(&state.users);
    let Some(user) = users.iter().find(|u| u.id == user_id) else {
        return error_response(401, "Unauthenticated.");
    };
    Json(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "is_admin": user.is_admin,
    }))
    .into_response()
}

// =============================================================================
// Cart handlers
// =============================================================================

async fn get_cart(State(state): State<Arc<ShopState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    // Bare array, not an envelope.
    Json(locked(&state.cart).clone()).into_response()
}

async fn add_to_cart(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let product_id = ProductId::new(body["product_id"].as_i64().unwrap_or_default());
    let quantity = u32::try_from(body["quantity"].as_u64().unwrap_or(1)).unwrap_or(1);
    let snapshot = locked(&state.products)
        .iter()
        .find(|p| p.id == product_id)
        .map(|p| ProductSnapshot {
            name: p.name.clone(),
            price: p.price,
            image_path: p.image_path.clone(),
        });
    let Some(product) = snapshot else {
        return error_response(404, "Product not found.");
    };
    let mut cart = locked(&state.cart);
    if let Some(line) = cart.iter_mut().find(|l| l.product_id == product_id) {
        line.quantity += quantity;
    } else {
        cart.push(CartLine {
            id: CartLineId::new(state.mint_id()),
            product_id,
            quantity,
            product,
        });
    }
    Json(cart.clone()).into_response()
}

async fn update_cart_line(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let quantity = u32::try_from(body["quantity"].as_u64().unwrap_or_default()).unwrap_or(0);
    let mut cart = locked(&state.cart);
    let Some(line) = cart.iter_mut().find(|l| l.id == CartLineId::new(id)) else {
        return error_response(404, "Cart line not found.");
    };
    line.quantity = quantity;
    Json(cart.clone()).into_response()
}

async fn delete_cart_line(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let mut cart = locked(&state.cart);
    let before = cart.len();
    cart.retain(|l| l.id != CartLineId::new(id));
    if cart.len() == before {
        return error_response(404, "Cart line not found.");
    }
    Json(json!({ "message": "Removed." })).into_response()
}

// =============================================================================
// Order handlers
// =============================================================================

fn paginate<T: Clone>(items: &[T], page: usize) -> (Vec<T>, usize) {
    let total_pages = items.len().div_ceil(PER_PAGE).max(1);
    let start = page.max(1).saturating_sub(1) * PER_PAGE;
    let slice = items.iter().skip(start).take(PER_PAGE).cloned().collect();
    (slice, total_pages)
}

async fn list_orders(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let status: Option<OrderStatus> = params
        .get("status")
        .and_then(|s| serde_json::from_value(Value::String(s.clone())).ok());
    let start_date = params
        .get("start_date")
        .and_then(|s| s.parse::<chrono::NaiveDate>().ok());
    let end_date = params
        .get("end_date")
        .and_then(|s| s.parse::<chrono::NaiveDate>().ok());
    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);

    let orders: Vec<Order> = locked(&state.orders)
        .iter()
        .filter(|o| status.is_none_or(|wanted| o.status == wanted))
        .filter(|o| start_date.is_none_or(|d| o.placed_at.date_naive() >= d))
        .filter(|o| end_date.is_none_or(|d| o.placed_at.date_naive() <= d))
        .cloned()
        .collect();
    let (items, total_pages) = paginate(&orders, page);
    Json(json!({ "items": items, "total_pages": total_pages })).into_response()
}

async fn place_order(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let Ok(method) =
        serde_json::from_value::<PaymentMethod>(body["payment_method"].clone())
    else {
        return error_response(422, "Unknown payment method.");
    };
    let Ok(purchased) = serde_json::from_value::<Vec<CartLine>>(body["cart_items"].clone()) else {
        return error_response(422, "Malformed cart items.");
    };
    if purchased.is_empty() {
        return error_response(422, "Cart is empty.");
    }
    let Ok(total) = serde_json::from_value::<Money>(body["total"].clone()) else {
        return error_response(422, "Malformed total.");
    };

    let order = Order {
        id: OrderId::new(state.mint_id()),
        status: match method {
            PaymentMethod::Cod => OrderStatus::Pending,
            PaymentMethod::Stripe => OrderStatus::AwaitingPayment,
        },
        payment_method: method,
        full_name: body["full_name"].as_str().unwrap_or_default().to_string(),
        shipping_address: body["shipping_address"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        items: purchased
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                name: line.product.name.clone(),
                price: line.product.price,
                quantity: line.quantity,
                image_path: line.product.image_path.clone(),
            })
            .collect(),
        total,
        placed_at: Utc::now(),
    };

    // Checkout consumes the purchased lines.
    let purchased_ids: Vec<CartLineId> = purchased.iter().map(|l| l.id).collect();
    locked(&state.cart).retain(|l| !purchased_ids.contains(&l.id));

    let order_id = order.id;
    locked(&state.orders).push(order.clone());

    match method {
        PaymentMethod::Cod => Json(order).into_response(),
        PaymentMethod::Stripe => Json(json!({
            "checkout_url": format!("https://checkout.stripe.test/pay/{order_id}"),
        }))
        .into_response(),
    }
}

async fn change_order_status(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let Ok(status) = serde_json::from_value::<OrderStatus>(body["status"].clone()) else {
        return error_response(422, "Unknown status.");
    };
    let mut orders = locked(&state.orders);
    let Some(order) = orders.iter_mut().find(|o| o.id == OrderId::new(id)) else {
        return error_response(404, "Order not found.");
    };
    order.status = status;
    Json(json!({ "message": "Status updated." })).into_response()
}

async fn cancel_order(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let id = OrderId::new(body["order_id"].as_i64().unwrap_or_default());
    let mut orders = locked(&state.orders);
    let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
        return error_response(404, "Order not found.");
    };
    order.status = OrderStatus::Cancelled;
    Json(json!({ "message": "Order cancelled." })).into_response()
}

// =============================================================================
// Product handlers
// =============================================================================

async fn list_products(
    State(state): State<Arc<ShopState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    // Public: the catalog needs no session.
    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let min_price = params
        .get("min_price")
        .and_then(|p| p.parse::<Decimal>().ok());
    let max_price = params
        .get("max_price")
        .and_then(|p| p.parse::<Decimal>().ok());
    let featured = params.get("featured").and_then(|f| f.parse::<bool>().ok());

    let products: Vec<Product> = locked(&state.products)
        .iter()
        .filter(|p| {
            params
                .get("search")
                .is_none_or(|s| p.name.to_lowercase().contains(&s.to_lowercase()))
        })
        .filter(|p| params.get("brand").is_none_or(|b| &p.brand == b))
        .filter(|p| params.get("category").is_none_or(|c| &p.category == c))
        .filter(|p| min_price.is_none_or(|min| p.price.amount >= min))
        .filter(|p| max_price.is_none_or(|max| p.price.amount <= max))
        .filter(|p| featured.is_none_or(|f| p.featured == f))
        .cloned()
        .collect();
    let (items, total_pages) = paginate(&products, page);
    Json(json!({ "items": items, "total_pages": total_pages })).into_response()
}

async fn create_product(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut image_path = "/images/placeholder.jpg".to_string();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or("upload.bin").to_string();
            let Ok(bytes) = field.bytes().await else {
                return error_response(422, "Broken image upload.");
            };
            image_path = format!("/uploads/{file_name}");
            *locked(&state.last_upload) = Some((file_name, bytes.len()));
        } else {
            let Ok(text) = field.text().await else {
                return error_response(422, "Broken form field.");
            };
            fields.insert(name, text);
        }
    }

    let Some(price) = fields
        .get("price")
        .and_then(|p| p.parse::<Decimal>().ok())
    else {
        return error_response(422, "Price must be a decimal.");
    };
    let product = Product {
        id: ProductId::new(state.mint_id()),
        name: fields.get("name").cloned().unwrap_or_default(),
        description: fields.get("description").cloned().unwrap_or_default(),
        brand: fields.get("brand").cloned().unwrap_or_default(),
        category: fields.get("category").cloned().unwrap_or_default(),
        price: Money::new(price, CurrencyCode::USD),
        image_path,
        featured: fields
            .get("featured")
            .is_some_and(|f| f == "true"),
    };
    if product.name.is_empty() {
        return error_response(422, "Name is required.");
    }
    locked(&state.products).push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn delete_product(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let mut products = locked(&state.products);
    let before = products.len();
    products.retain(|p| p.id != ProductId::new(id));
    if products.len() == before {
        return error_response(404, "Product not found.");
    }
    Json(json!({ "message": "Deleted." })).into_response()
}

// =============================================================================
// Analytics, files, Stripe
// =============================================================================

async fn sales_report(State(state): State<Arc<ShopState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    if state.analytics_malformed.load(Ordering::Relaxed) {
        return Json(json!({ "rows": "not-a-report" })).into_response();
    }
    Json(json!([
        {
            "date": "2026-08-23",
            "orders": 2,
            "revenue": { "amount": "21.50", "currency": "USD" },
        },
        {
            "date": "2026-08-24",
            "orders": 1,
            "revenue": { "amount": "12.50", "currency": "USD" },
        },
    ]))
    .into_response()
}

async fn revenue_statistics(State(state): State<Arc<ShopState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    if state.analytics_malformed.load(Ordering::Relaxed) {
        return Json(json!({ "totals": null })).into_response();
    }
    Json(json!({
        "total_revenue": { "amount": "34.00", "currency": "USD" },
        "order_count": 3,
        "average_order_value": { "amount": "11.33", "currency": "USD" },
    }))
    .into_response()
}

async fn product_performance(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    if state.analytics_malformed.load(Ordering::Relaxed) {
        return Json(json!("nope")).into_response();
    }
    Json(json!([
        {
            "product_id": 1,
            "name": "Mint Tea",
            "units_sold": 5,
            "revenue": { "amount": "22.50", "currency": "USD" },
        },
    ]))
    .into_response()
}

async fn download_file(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let Some(path) = params.get("path") else {
        return error_response(422, "Missing path.");
    };
    format!("file-bytes:{path}").into_bytes().into_response()
}

async fn stripe_checkout_url(
    State(state): State<Arc<ShopState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = require_auth(&state, &headers) {
        return denied;
    }
    let Some(session_id) = params.get("session_id") else {
        return error_response(422, "Missing session id.");
    };
    Json(json!({
        "url": format!("https://checkout.stripe.test/resume/{session_id}"),
    }))
    .into_response()
}
