//! End-to-end flows for the admin pages against the stub shop server.

use std::time::Instant;

use pawmart_core::ui::DomPatch;
use pawmart_core::{CustomerId, OrderId, OrderStatus, Price, ProductId};

use pawmart_admin::api::AdminApi;
use pawmart_admin::config::AdminConfig;
use pawmart_admin::pages::customers::CustomersPage;
use pawmart_admin::pages::dashboard::DashboardPage;
use pawmart_admin::pages::orders::OrdersPage;
use pawmart_admin::pages::products::{ProductForm, ProductsPage};

use pawmart_integration_tests::spawn_stub;

fn api_for(base_url: &str) -> AdminApi {
    let config = AdminConfig::for_base_url(base_url.parse().expect("stub url"));
    AdminApi::new(&config)
}

fn html_of(update: &pawmart_core::ui::UiUpdate, target: &str) -> String {
    update
        .patches
        .iter()
        .find_map(|p| match p {
            DomPatch::SetHtml { target: t, html } if t == target => Some(html.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn text_of(update: &pawmart_core::ui::UiUpdate, target: &str) -> Option<String> {
    update.patches.iter().find_map(|p| match p {
        DomPatch::SetText { target: t, text } if t == target => Some(text.clone()),
        _ => None,
    })
}

#[tokio::test]
async fn product_list_renders_rows_and_statistics() {
    let stub = spawn_stub().await;
    let mut page = ProductsPage::new(api_for(&stub.base_url));

    let update = page.load().await;

    let table = html_of(&update, "productsTableBody");
    assert!(table.contains("Hạt Royal Canin"));
    assert!(table.contains("185.000₫"));
    // Derived stock statuses: one in-stock, one low, one out.
    assert_eq!(text_of(&update, "totalProducts").as_deref(), Some("3"));
    assert_eq!(text_of(&update, "inStockProducts").as_deref(), Some("1"));
    assert_eq!(text_of(&update, "lowStockProducts").as_deref(), Some("1"));
    assert_eq!(text_of(&update, "outOfStockProducts").as_deref(), Some("1"));
}

#[tokio::test]
async fn zero_price_product_is_rejected_before_any_request() {
    let stub = spawn_stub().await;
    let mut page = ProductsPage::new(api_for(&stub.base_url));
    page.load().await;

    let form = ProductForm {
        name: "Sản phẩm lỗi".to_string(),
        category_id: Some(pawmart_core::CategoryId::new(1)),
        price: Price::from_vnd(0),
        quantity: 5,
        ..ProductForm::default()
    };
    let update = page.save(form).await;

    assert!(update
        .dialogs
        .first()
        .is_some_and(|d| d.body.contains("điền đầy đủ thông tin")));
    // The server never saw a fourth product.
    assert_eq!(stub.state.lock().expect("state").products.len(), 3);
}

#[tokio::test]
async fn saving_a_valid_product_posts_the_form_and_reloads() {
    let stub = spawn_stub().await;
    let mut page = ProductsPage::new(api_for(&stub.base_url));
    page.load().await;

    let form = ProductForm {
        name: "Cát vệ sinh".to_string(),
        category_id: Some(pawmart_core::CategoryId::new(4)),
        brand: "CatSand".to_string(),
        price: Price::from_vnd(75_000),
        quantity: 30,
        ..ProductForm::default()
    };
    let update = page.save(form).await;

    assert!(update
        .dialogs
        .iter()
        .any(|d| d.body == "Sản phẩm mới đã được thêm."));
    let state = stub.state.lock().expect("state");
    assert!(state.products.iter().any(|p| p.name == "Cát vệ sinh"));
    drop(state);
    // The reload brought the new row into the page state.
    assert_eq!(page.products().len(), 4);
}

#[tokio::test]
async fn deleting_a_product_goes_through_confirmation() {
    let stub = spawn_stub().await;
    let mut page = ProductsPage::new(api_for(&stub.base_url));
    page.load().await;

    page.request_delete(ProductId::new(2));
    let update = page.confirm_delete().await;

    assert!(update
        .dialogs
        .iter()
        .any(|d| d.body == "Sản phẩm đã được xóa thành công."));
    assert!(!stub
        .state
        .lock()
        .expect("state")
        .products
        .iter()
        .any(|p| p.id == 2));
    assert_eq!(page.products().len(), 2);
}

#[tokio::test]
async fn dismissed_confirmation_deletes_nothing() {
    let stub = spawn_stub().await;
    let mut page = ProductsPage::new(api_for(&stub.base_url));
    page.load().await;

    page.request_delete(ProductId::new(2));
    page.dismiss_confirmation();
    let update = page.confirm_delete().await;

    assert!(update.dialogs.is_empty());
    assert_eq!(stub.state.lock().expect("state").products.len(), 3);
}

#[tokio::test]
async fn confirmed_customer_delete_closes_modal_and_reloads_everything() {
    let stub = spawn_stub().await;
    let mut page = CustomersPage::new(api_for(&stub.base_url));
    page.load().await;
    page.view_detail(CustomerId::new(7)).await;

    page.request_delete(CustomerId::new(7), "Nguyen Van A");
    let update = page.confirm().await;

    // DELETE /api/admin/customers/7 happened.
    assert!(!stub
        .state
        .lock()
        .expect("state")
        .customers
        .iter()
        .any(|c| c.id == 7));
    // Modal closed, list and stats reloaded.
    assert!(update.patches.iter().any(|p| matches!(
        p,
        DomPatch::CloseModal { target } if target == "customer-detail-modal"
    )));
    assert!(update
        .toasts
        .iter()
        .any(|t| t.message == "Xóa khách hàng thành công"));
    assert_eq!(page.customers().len(), 1);
    assert_eq!(text_of(&update, "total-customers").as_deref(), Some("1"));
}

#[tokio::test]
async fn order_status_update_reloads_list_and_stats() {
    let stub = spawn_stub().await;
    let mut page = OrdersPage::new(api_for(&stub.base_url));
    page.load().await;
    page.view_detail(OrderId::new(101)).await;

    let update = page.update_status(OrderStatus::Delivered).await;

    assert_eq!(
        stub.state
            .lock()
            .expect("state")
            .orders
            .iter()
            .find(|o| o.id == 101)
            .map(|o| o.status.clone()),
        Some("delivered".to_string())
    );
    assert!(update
        .toasts
        .iter()
        .any(|t| t.message == "Cập nhật trạng thái thành công"));
    assert_eq!(text_of(&update, "delivered-orders").as_deref(), Some("1"));
    // No optimistic update: the rendered row came from the re-fetch.
    let table = html_of(&update, "orders-table-body");
    assert!(table.contains("status-delivered"));
}

#[tokio::test]
async fn order_detail_populates_the_modal() {
    let stub = spawn_stub().await;
    let mut page = OrdersPage::new(api_for(&stub.base_url));
    page.load().await;

    let update = page.view_detail(OrderId::new(101)).await;

    assert_eq!(text_of(&update, "modal-order-id").as_deref(), Some("101"));
    assert_eq!(
        text_of(&update, "modal-customer-name").as_deref(),
        Some("Nguyen Van A")
    );
    let items = html_of(&update, "modal-order-items");
    // 2 × 185.000₫ line total.
    assert!(items.contains("370.000₫"));
    assert!(update.patches.iter().any(|p| matches!(
        p,
        DomPatch::OpenModal { target } if target == "order-detail-modal"
    )));
}

#[tokio::test]
async fn dashboard_loads_all_four_feeds() {
    let stub = spawn_stub().await;
    let mut page = DashboardPage::new(api_for(&stub.base_url), Instant::now());

    let update = page.init().await;

    assert_eq!(text_of(&update, "totalProducts").as_deref(), Some("3"));
    assert_eq!(text_of(&update, "pendingOrders").as_deref(), Some("1"));
    assert_eq!(text_of(&update, "totalUsers").as_deref(), Some("2"));
    assert!(update.patches.iter().any(|p| matches!(
        p,
        DomPatch::RenderChart { target, labels, .. }
            if target == "salesChart" && labels.len() == 7
    )));
    let low_stock = html_of(&update, "lowStockProductsBody");
    assert!(low_stock.contains("Pate Whiskas"));
    assert!(low_stock.contains("Vòng cổ da"));
}

#[tokio::test]
async fn dashboard_chart_period_switch_refetches() {
    let stub = spawn_stub().await;
    let mut page = DashboardPage::new(api_for(&stub.base_url), Instant::now());
    page.init().await;

    let update = page.load_chart(30).await;
    assert_eq!(page.chart_days(), 30);
    assert!(update.patches.iter().any(|p| matches!(
        p,
        DomPatch::RenderChart { labels, .. } if labels.len() == 30
    )));
}
