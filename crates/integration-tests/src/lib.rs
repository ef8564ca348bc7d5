//! Test harness for the PawMart page controllers.
//!
//! Spins up an in-process stub of the shop server - the external
//! collaborator every page talks to - with a small in-memory state and the
//! same `{success, message, ...}` envelopes, then lets the tests drive the
//! real clients and controllers against it.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Once};

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Discount granted by the one promo code the stub knows (`SALE10`).
pub const SALE10_DISCOUNT: i64 = 50_000;

/// A product in the stub's inventory.
#[derive(Debug, Clone)]
pub struct StubProduct {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: i64,
    pub quantity: i64,
    pub description: String,
}

/// A customer account.
#[derive(Debug, Clone)]
pub struct StubCustomer {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub total_orders: i64,
    pub total_spent: i64,
    pub status: String,
}

/// An order.
#[derive(Debug, Clone)]
pub struct StubOrder {
    pub id: i64,
    pub customer_name: String,
    pub date: String,
    pub total: i64,
    pub status: String,
}

/// Everything the stub server remembers.
#[derive(Debug, Default)]
pub struct ShopState {
    pub products: Vec<StubProduct>,
    pub customers: Vec<StubCustomer>,
    pub orders: Vec<StubOrder>,
    /// Cart lines, product id to quantity.
    pub cart: BTreeMap<i64, i64>,
    pub discount: i64,
}

impl ShopState {
    /// The dataset the tests start from.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            products: vec![
                StubProduct {
                    id: 1,
                    name: "Hạt Royal Canin".to_string(),
                    category: "Thức ăn cho chó".to_string(),
                    brand: "Royal Canin".to_string(),
                    price: 185_000,
                    quantity: 25,
                    description: "Hạt khô cho chó trưởng thành".to_string(),
                },
                StubProduct {
                    id: 2,
                    name: "Pate Whiskas".to_string(),
                    category: "Thức ăn cho mèo".to_string(),
                    brand: "Whiskas".to_string(),
                    price: 25_000,
                    quantity: 8,
                    description: String::new(),
                },
                StubProduct {
                    id: 3,
                    name: "Vòng cổ da".to_string(),
                    category: "Phụ kiện cho chó".to_string(),
                    brand: String::new(),
                    price: 99_000,
                    quantity: 0,
                    description: String::new(),
                },
            ],
            customers: vec![
                StubCustomer {
                    id: 7,
                    full_name: "Nguyen Van A".to_string(),
                    email: "a@example.com".to_string(),
                    phone: "0912345678".to_string(),
                    total_orders: 3,
                    total_spent: 1_350_000,
                    status: "active".to_string(),
                },
                StubCustomer {
                    id: 8,
                    full_name: "Tran Thi B".to_string(),
                    email: "b@example.com".to_string(),
                    phone: "0987654321".to_string(),
                    total_orders: 0,
                    total_spent: 0,
                    status: "inactive".to_string(),
                },
            ],
            orders: vec![
                StubOrder {
                    id: 101,
                    customer_name: "Nguyen Van A".to_string(),
                    date: "2025-03-14 09:05:00".to_string(),
                    total: 450_000,
                    status: "pending".to_string(),
                },
                StubOrder {
                    id: 102,
                    customer_name: "Tran Thi B".to_string(),
                    date: "2025-03-15 10:00:00".to_string(),
                    total: 99_000,
                    status: "shipped".to_string(),
                },
            ],
            cart: BTreeMap::from([(1, 2), (2, 1)]),
            discount: 0,
        }
    }

    fn cart_totals(&self, touched: Option<i64>) -> Value {
        let subtotal: i64 = self
            .cart
            .iter()
            .filter_map(|(id, qty)| {
                self.products
                    .iter()
                    .find(|p| p.id == *id)
                    .map(|p| p.price * qty)
            })
            .sum();
        let cart_count: i64 = self.cart.values().sum();
        let item_count = i64::try_from(self.cart.len()).unwrap_or(0);
        let item_subtotal = touched.and_then(|id| {
            let qty = self.cart.get(&id)?;
            let product = self.products.iter().find(|p| p.id == id)?;
            Some(product.price * qty)
        });

        let mut totals = json!({
            "success": true,
            "cart_count": cart_count,
            "subtotal": subtotal,
            "total": subtotal - self.discount,
            "item_count": item_count,
        });
        if let Some(item_subtotal) = item_subtotal {
            totals["item_subtotal"] = json!(item_subtotal);
        }
        if self.discount > 0 {
            totals["discount"] = json!(self.discount);
        }
        totals
    }
}

type Shared = Arc<Mutex<ShopState>>;

/// A running stub server.
pub struct StubShop {
    pub base_url: String,
    pub state: Shared,
}

/// Initialize test logging once per process.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Spawn the stub on an ephemeral port with the seeded dataset.
///
/// # Panics
///
/// Panics if the listener cannot bind.
pub async fn spawn_stub() -> StubShop {
    init_tracing();
    let state: Shared = Arc::new(Mutex::new(ShopState::seeded()));

    let app = Router::new()
        // Product admin
        .route("/api/products", get(list_products))
        .route("/admin/products/add", post(add_product))
        .route("/admin/products/edit/{id}", post(edit_product))
        .route("/admin/products/delete/{id}", post(delete_product))
        // Customer admin
        .route("/api/admin/customers", get(list_customers))
        .route(
            "/api/admin/customers/{id}",
            get(customer_detail).delete(delete_customer),
        )
        .route("/api/admin/customer-stats", get(customer_stats))
        // Order admin
        .route("/api/admin/orders", get(list_orders))
        .route("/api/admin/orders/{id}", get(order_detail))
        .route("/api/admin/orders/{id}/status", put(update_order_status))
        .route("/api/admin/order-stats", get(order_stats))
        // Dashboard
        .route("/api/admin/quick-stats", get(quick_stats))
        .route("/api/admin/sales-chart", get(sales_chart))
        .route("/api/admin/recent-orders", get(recent_orders))
        .route("/api/admin/low-stock-products", get(low_stock_products))
        // Cart
        .route("/add-to-cart", post(add_to_cart))
        .route("/update-cart", post(update_cart))
        .route("/remove-from-cart", post(remove_from_cart))
        .route("/clear-cart", post(clear_cart))
        .route("/apply-promo", post(apply_promo))
        // Profile
        .route("/update-profile", post(ok_envelope))
        .route("/add-address", post(ok_envelope))
        .route("/update-address", post(ok_envelope))
        .route("/delete-address", post(ok_envelope))
        .route("/change-password", post(change_password))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    StubShop {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn envelope_err(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

// =============================================================================
// Product admin handlers
// =============================================================================

async fn list_products(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    let products: Vec<Value> = state
        .products
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "type": p.category,
                "brand": p.brand,
                "price": p.price,
                "quantity": p.quantity,
                "description": p.description,
            })
        })
        .collect();
    Json(json!({ "success": true, "products": products }))
}

fn category_name(id: &str) -> String {
    match id {
        "2" => "Thức ăn cho mèo",
        "3" => "Phụ kiện cho chó",
        "4" => "Phụ kiện cho mèo",
        "5" => "Thuốc & Vitamin",
        _ => "Thức ăn cho chó",
    }
    .to_string()
}

async fn collect_form(mut multipart: Multipart) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap_or_default();
        fields.insert(name, value);
    }
    fields
}

async fn add_product(State(state): State<Shared>, multipart: Multipart) -> Response {
    let fields = collect_form(multipart).await;
    let name = fields.get("tenSanPham").cloned().unwrap_or_default();
    if name.trim().is_empty() {
        // The form routes answer errors as raw text, not an envelope.
        return (StatusCode::BAD_REQUEST, "Thiếu tên sản phẩm").into_response();
    }

    let mut state = state.lock().unwrap();
    let id = state.products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
    let product = StubProduct {
        id,
        name,
        category: category_name(fields.get("maLoai").map_or("1", String::as_str)),
        brand: fields.get("thuongHieu").cloned().unwrap_or_default(),
        price: parse_amount(fields.get("giaBan")),
        quantity: parse_amount(fields.get("soLuong")),
        description: fields.get("moTa").cloned().unwrap_or_default(),
    };
    state.products.push(product);
    StatusCode::OK.into_response()
}

async fn edit_product(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Response {
    let fields = collect_form(multipart).await;
    let mut state = state.lock().unwrap();
    let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
        return (StatusCode::NOT_FOUND, "Sản phẩm không tồn tại").into_response();
    };
    if let Some(name) = fields.get("tenSanPham") {
        product.name.clone_from(name);
    }
    product.price = parse_amount(fields.get("giaBan"));
    product.quantity = parse_amount(fields.get("soLuong"));
    StatusCode::OK.into_response()
}

fn parse_amount(value: Option<&String>) -> i64 {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .map_or(0, |v| v.round() as i64)
}

async fn delete_product(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().unwrap();
    let before = state.products.len();
    state.products.retain(|p| p.id != id);
    if state.products.len() == before {
        return envelope_err(StatusCode::NOT_FOUND, "Sản phẩm không tồn tại");
    }
    Json(json!({ "success": true, "message": "Đã xóa sản phẩm" })).into_response()
}

// =============================================================================
// Customer admin handlers
// =============================================================================

fn customer_json(customer: &StubCustomer) -> Value {
    json!({
        "id": customer.id,
        "full_name": customer.full_name,
        "email": customer.email,
        "phone": customer.phone,
        "total_orders": customer.total_orders,
        "total_spent": customer.total_spent,
        "status": customer.status,
    })
}

async fn list_customers(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    let customers: Vec<Value> = state.customers.iter().map(customer_json).collect();
    Json(json!({ "success": true, "customers": customers }))
}

async fn customer_detail(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = state.lock().unwrap();
    let Some(customer) = state.customers.iter().find(|c| c.id == id) else {
        return envelope_err(StatusCode::NOT_FOUND, "Khách hàng không tồn tại");
    };
    let mut detail = customer_json(customer);
    detail["recent_orders"] = json!([]);
    Json(json!({ "success": true, "customer": detail })).into_response()
}

async fn delete_customer(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().unwrap();
    let before = state.customers.len();
    state.customers.retain(|c| c.id != id);
    if state.customers.len() == before {
        return envelope_err(StatusCode::NOT_FOUND, "Khách hàng không tồn tại");
    }
    Json(json!({ "success": true, "message": "Đã xóa khách hàng" })).into_response()
}

async fn customer_stats(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    let active = state
        .customers
        .iter()
        .filter(|c| c.status == "active")
        .count();
    let vip = state
        .customers
        .iter()
        .filter(|c| c.total_spent > 1_000_000)
        .count();
    Json(json!({
        "success": true,
        "stats": {
            "total": state.customers.len(),
            "active": active,
            "new_this_month": 1,
            "vip": vip,
        }
    }))
}

// =============================================================================
// Order admin handlers
// =============================================================================

fn order_json(order: &StubOrder) -> Value {
    json!({
        "id": order.id,
        "customer_name": order.customer_name,
        "date": order.date,
        "total": order.total,
        "status": order.status,
    })
}

async fn list_orders(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    let orders: Vec<Value> = state.orders.iter().map(order_json).collect();
    Json(json!({ "success": true, "orders": orders }))
}

async fn order_detail(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = state.lock().unwrap();
    let Some(order) = state.orders.iter().find(|o| o.id == id) else {
        return envelope_err(StatusCode::NOT_FOUND, "Đơn hàng không tồn tại");
    };
    Json(json!({
        "success": true,
        "order": {
            "id": order.id,
            "customer": {
                "name": order.customer_name,
                "email": "a@example.com",
                "phone": "0912345678",
            },
            "shipping": {
                "receiver_name": order.customer_name,
                "address": "12 Lý Thường Kiệt, Hà Nội",
                "phone": "0912345678",
            },
            "items": [
                { "product_name": "Hạt Royal Canin", "quantity": 2, "price": 185_000 },
                { "product_name": "Vòng cổ da", "quantity": 1, "price": 80_000 },
            ],
            "total": order.total,
            "status": order.status,
        }
    }))
    .into_response()
}

async fn update_order_status(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let Some(status) = body.get("status").and_then(Value::as_str) else {
        return envelope_err(StatusCode::BAD_REQUEST, "Thiếu trạng thái");
    };
    let mut state = state.lock().unwrap();
    let Some(order) = state.orders.iter_mut().find(|o| o.id == id) else {
        return envelope_err(StatusCode::NOT_FOUND, "Đơn hàng không tồn tại");
    };
    order.status = status.to_string();
    Json(json!({ "success": true, "message": "Đã cập nhật trạng thái" })).into_response()
}

async fn order_stats(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    let count = |status: &str| state.orders.iter().filter(|o| o.status == status).count();
    Json(json!({
        "success": true,
        "stats": {
            "total": state.orders.len(),
            "pending": count("pending"),
            "shipped": count("shipped"),
            "delivered": count("delivered"),
        }
    }))
}

// =============================================================================
// Dashboard handlers
// =============================================================================

async fn quick_stats(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    let stock = |f: fn(i64) -> bool| state.products.iter().filter(|p| f(p.quantity)).count();
    Json(json!({
        "success": true,
        "data": {
            "products": {
                "total": state.products.len(),
                "in_stock": stock(|q| q > 10),
                "low_stock": stock(|q| q > 0 && q <= 10),
                "out_of_stock": stock(|q| q == 0),
            },
            "orders": {
                "total": state.orders.len(),
                "pending": state.orders.iter().filter(|o| o.status == "pending").count(),
            },
            "users": { "total": state.customers.len() },
        }
    }))
}

async fn sales_chart(
    axum::extract::Query(params): axum::extract::Query<BTreeMap<String, String>>,
) -> Json<Value> {
    let days = params
        .get("period")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(7);
    let labels: Vec<String> = (1..=days).map(|d| format!("Ngày {d}")).collect();
    let values: Vec<f64> = (1..=days).map(|d| (d as f64) * 100_000.0).collect();
    Json(json!({ "success": true, "chartData": { "labels": labels, "values": values } }))
}

async fn recent_orders(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    let orders: Vec<Value> = state.orders.iter().rev().map(order_json).collect();
    Json(json!({ "success": true, "orders": orders }))
}

async fn low_stock_products(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    let products: Vec<Value> = state
        .products
        .iter()
        .filter(|p| p.quantity <= 10)
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "category": p.category,
                "quantity": p.quantity,
                "price": p.price,
            })
        })
        .collect();
    Json(json!({ "success": true, "products": products }))
}

// =============================================================================
// Cart handlers
// =============================================================================

async fn add_to_cart(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let Some(product_id) = body.get("product_id").and_then(Value::as_i64) else {
        return envelope_err(StatusCode::BAD_REQUEST, "Thiếu thông tin sản phẩm!");
    };
    let quantity = body.get("quantity").and_then(Value::as_i64).unwrap_or(1);

    let mut state = state.lock().unwrap();
    if !state.products.iter().any(|p| p.id == product_id) {
        return envelope_err(StatusCode::BAD_REQUEST, "Sản phẩm không tồn tại");
    }
    *state.cart.entry(product_id).or_insert(0) += quantity;
    let cart_count: i64 = state.cart.values().sum();
    Json(json!({
        "success": true,
        "message": "Đã thêm vào giỏ hàng",
        "cart_count": cart_count,
    }))
    .into_response()
}

async fn update_cart(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let Some(product_id) = body.get("product_id").and_then(Value::as_i64) else {
        return envelope_err(StatusCode::BAD_REQUEST, "Thiếu thông tin sản phẩm!");
    };
    let quantity = body.get("quantity").and_then(Value::as_i64).unwrap_or(1);

    let mut state = state.lock().unwrap();
    let Some(product) = state.products.iter().find(|p| p.id == product_id) else {
        return envelope_err(StatusCode::BAD_REQUEST, "Sản phẩm không tồn tại");
    };
    if quantity > product.quantity {
        return envelope_err(StatusCode::BAD_REQUEST, "Số lượng vượt quá tồn kho");
    }
    state.cart.insert(product_id, quantity);
    Json(state.cart_totals(Some(product_id))).into_response()
}

async fn remove_from_cart(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let Some(product_id) = body.get("product_id").and_then(Value::as_i64) else {
        return envelope_err(StatusCode::BAD_REQUEST, "Thiếu thông tin sản phẩm!");
    };
    let mut state = state.lock().unwrap();
    state.cart.remove(&product_id);
    Json(state.cart_totals(None)).into_response()
}

async fn clear_cart(State(state): State<Shared>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.cart.clear();
    state.discount = 0;
    Json(state.cart_totals(None))
}

async fn apply_promo(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let code = body
        .get("promo_code")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if code != "SALE10" {
        return envelope_err(StatusCode::BAD_REQUEST, "Mã giảm giá không hợp lệ");
    }
    let mut state = state.lock().unwrap();
    state.discount = SALE10_DISCOUNT;
    Json(state.cart_totals(None)).into_response()
}

// =============================================================================
// Profile handlers
// =============================================================================

async fn ok_envelope() -> Json<Value> {
    Json(json!({ "success": true, "message": "OK" }))
}

async fn change_password(Json(body): Json<Value>) -> Response {
    let current = body
        .get("current_password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if current == "sai-mật-khẩu" {
        return envelope_err(StatusCode::BAD_REQUEST, "Mật khẩu hiện tại không đúng");
    }
    Json(json!({ "success": true, "message": "Đã đổi mật khẩu" })).into_response()
}
