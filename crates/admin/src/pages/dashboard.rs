//! Admin dashboard page.
//!
//! Four independent feeds: quick stats, the revenue chart for a selectable
//! period, the recent-orders table, and the low-stock table. Stats and chart
//! re-fetch every sixty seconds for the life of the page.

use std::time::{Duration, Instant};

use tracing::warn;

use pawmart_core::dates::format_datetime;
use pawmart_core::html::escape;
use pawmart_core::timing::RefreshTimer;
use pawmart_core::ui::{DomPatch, UiUpdate};
use pawmart_core::{OrderId, ProductId};

use crate::api::dashboard::{LowStockProduct, QuickStats};
use crate::api::orders::OrderSummary;
use crate::api::AdminApi;

// Element ids the dashboard carries.
const CHART: &str = "salesChart";
const RECENT_ORDERS_BODY: &str = "recentOrdersBody";
const LOW_STOCK_BODY: &str = "lowStockProductsBody";
const REFRESH_BUTTON: &str = "refreshDashboard";

const AUTO_REFRESH_EVERY: Duration = Duration::from_secs(60);
const DEFAULT_CHART_DAYS: u32 = 7;

/// Chart periods the buttons offer.
const CHART_PERIODS: &[u32] = &[7, 30, 90];

/// Controller for the dashboard page.
pub struct DashboardPage {
    api: AdminApi,
    chart_days: u32,
    auto_refresh: RefreshTimer,
}

impl DashboardPage {
    #[must_use]
    pub fn new(api: AdminApi, now: Instant) -> Self {
        Self {
            api,
            chart_days: DEFAULT_CHART_DAYS,
            auto_refresh: RefreshTimer::new(AUTO_REFRESH_EVERY, now),
        }
    }

    /// The chart period currently selected.
    #[must_use]
    pub const fn chart_days(&self) -> u32 {
        self.chart_days
    }

    /// Everything the page fetches on open.
    pub async fn init(&mut self) -> UiUpdate {
        let mut update = self.load_statistics().await;
        update.merge(self.load_chart(self.chart_days).await);
        update.merge(self.load_recent_orders().await);
        update.merge(self.load_low_stock().await);
        update
    }

    /// Fetch and render the quick-stats cards.
    pub async fn load_statistics(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        match self.api.quick_stats().await {
            Ok(stats) => render_quick_stats(&mut update, stats),
            Err(e) => warn!(error = %e, "failed to load dashboard statistics"),
        }
        update
    }

    /// Fetch the revenue chart for a period button.
    ///
    /// Unknown periods fall back to the page default.
    pub async fn load_chart(&mut self, days: u32) -> UiUpdate {
        let days = if CHART_PERIODS.contains(&days) {
            days
        } else {
            DEFAULT_CHART_DAYS
        };
        self.chart_days = days;

        let mut update = UiUpdate::new();
        match self.api.sales_chart(days).await {
            Ok(chart) => {
                update.push(DomPatch::RenderChart {
                    target: CHART.to_string(),
                    labels: chart.labels,
                    values: chart.values,
                });
            }
            Err(e) => warn!(error = %e, days, "failed to load sales chart"),
        }
        update
    }

    /// Fetch and render the recent-orders table.
    pub async fn load_recent_orders(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        match self.api.recent_orders().await {
            Ok(orders) => update.set_html(RECENT_ORDERS_BODY, render_recent_orders(&orders)),
            Err(e) => warn!(error = %e, "failed to load recent orders"),
        }
        update
    }

    /// Fetch and render the low-stock table.
    pub async fn load_low_stock(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        match self.api.low_stock_products().await {
            Ok(products) => update.set_html(LOW_STOCK_BODY, render_low_stock(&products)),
            Err(e) => warn!(error = %e, "failed to load low-stock products"),
        }
        update
    }

    /// The refresh button: disable it, reload the three tables, restore it.
    pub async fn refresh(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        update.set_disabled(REFRESH_BUTTON, true);
        update.set_text(REFRESH_BUTTON, "Đang tải...");

        let (stats, orders, low_stock) = tokio::join!(
            self.load_statistics(),
            self.load_recent_orders(),
            self.load_low_stock(),
        );
        update.merge(stats);
        update.merge(orders);
        update.merge(low_stock);

        update.set_text(REFRESH_BUTTON, "Làm mới");
        update.set_disabled(REFRESH_BUTTON, false);
        update
    }

    /// Host-driven auto-refresh tick: stats and chart, every minute.
    pub async fn tick(&mut self, now: Instant) -> Option<UiUpdate> {
        if !self.auto_refresh.due(now) {
            return None;
        }
        let mut update = self.load_statistics().await;
        let days = self.chart_days;
        update.merge(self.load_chart(days).await);
        Some(update)
    }

    /// Self-driving variant of [`Self::tick`] for async hosts; loops for
    /// the life of the page task.
    pub async fn auto_refresh(&mut self, mut apply: impl FnMut(UiUpdate)) {
        let mut interval = tokio::time::interval(AUTO_REFRESH_EVERY);
        // The first tick of a tokio interval fires immediately; the page
        // already loaded, so skip it.
        interval.tick().await;
        loop {
            interval.tick().await;
            let mut update = self.load_statistics().await;
            let days = self.chart_days;
            update.merge(self.load_chart(days).await);
            apply(update);
        }
    }

    /// Row action: jump to the order's page.
    #[must_use]
    pub fn view_order(&self, id: OrderId) -> UiUpdate {
        let mut update = UiUpdate::new();
        update.push(DomPatch::Redirect {
            url: format!("/admin/orders/{id}"),
        });
        update
    }

    /// Row action: jump to the product editor.
    #[must_use]
    pub fn edit_product(&self, id: ProductId) -> UiUpdate {
        let mut update = UiUpdate::new();
        update.push(DomPatch::Redirect {
            url: format!("/admin/products/edit/{id}"),
        });
        update
    }
}

fn render_quick_stats(update: &mut UiUpdate, stats: QuickStats) {
    update.set_text("totalProducts", stats.products.total.to_string());
    update.set_text("inStockProducts", stats.products.in_stock.to_string());
    update.set_text("lowStockProducts", stats.products.low_stock.to_string());
    update.set_text("outOfStockProducts", stats.products.out_of_stock.to_string());
    update.set_text("totalOrders", stats.orders.total.to_string());
    update.set_text("pendingOrders", stats.orders.pending.to_string());
    update.set_text("totalUsers", stats.users.total.to_string());
}

fn render_recent_orders(orders: &[OrderSummary]) -> String {
    orders
        .iter()
        .map(|order| {
            format!(
                "<tr>\
                 <td>#{id}</td>\
                 <td>{name}</td>\
                 <td>{total}</td>\
                 <td>{date}</td>\
                 <td><span class=\"badge status-{status}\">{label}</span></td>\
                 <td><button class=\"btn btn-sm btn-outline-primary\" data-action=\"view-order\" data-id=\"{id}\"><i class=\"fas fa-eye\"></i></button></td>\
                 </tr>",
                id = order.id,
                name = escape(&order.customer_name),
                total = order.total.display(),
                date = format_datetime(&order.date),
                status = order.status,
                label = order.status.label(),
            )
        })
        .collect()
}

fn render_low_stock(products: &[LowStockProduct]) -> String {
    products
        .iter()
        .map(|product| {
            // The overview uses a tighter warning tier than the list page.
            let stock_class = if product.quantity == 0 {
                "danger"
            } else if product.quantity <= 5 {
                "warning"
            } else {
                "success"
            };
            format!(
                "<tr>\
                 <td>{name}</td>\
                 <td>{category}</td>\
                 <td><span class=\"badge bg-{stock_class}\">{quantity}</span></td>\
                 <td>{price}</td>\
                 <td><button class=\"btn btn-sm btn-outline-primary\" data-action=\"edit-product\" data-id=\"{id}\"><i class=\"fas fa-edit\"></i></button></td>\
                 </tr>",
                id = product.id,
                name = escape(&product.name),
                category = escape(&product.category),
                quantity = product.quantity,
                stock_class = stock_class,
                price = product.price.display(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pawmart_core::{OrderStatus, Price};

    use crate::config::AdminConfig;

    fn offline_api() -> AdminApi {
        let config = AdminConfig::for_base_url("http://127.0.0.1:9/".parse().expect("url"));
        AdminApi::new(&config)
    }

    #[test]
    fn test_low_stock_badge_tiers() {
        let rows = vec![
            LowStockProduct {
                id: ProductId::new(1),
                name: "Hạt Royal Canin".to_string(),
                category: "Thức ăn cho chó".to_string(),
                quantity: 0,
                price: Price::from_vnd(185_000),
            },
            LowStockProduct {
                id: ProductId::new(2),
                name: "Pate Whiskas".to_string(),
                category: "Thức ăn cho mèo".to_string(),
                quantity: 4,
                price: Price::from_vnd(25_000),
            },
            LowStockProduct {
                id: ProductId::new(3),
                name: "Vòng cổ da".to_string(),
                category: "Phụ kiện cho chó".to_string(),
                quantity: 8,
                price: Price::from_vnd(99_000),
            },
        ];
        let html = render_low_stock(&rows);
        assert!(html.contains("bg-danger"));
        assert!(html.contains("bg-warning"));
        assert!(html.contains("bg-success"));
        assert!(html.contains("data-action=\"edit-product\" data-id=\"1\""));
    }

    #[test]
    fn test_recent_orders_rendering() {
        let orders = vec![OrderSummary {
            id: OrderId::new(250),
            customer_name: "Nguyen Van A".to_string(),
            date: "2025-03-14 09:05:00".to_string(),
            total: Price::from_vnd(450_000),
            status: OrderStatus::Pending,
        }];
        let html = render_recent_orders(&orders);
        assert!(html.contains("#250"));
        assert!(html.contains("status-pending"));
        assert!(html.contains("450.000₫"));
    }

    #[test]
    fn test_row_actions_redirect() {
        let page = DashboardPage::new(offline_api(), Instant::now());
        let update = page.view_order(OrderId::new(9));
        assert!(update.patches.iter().any(|p| matches!(
            p,
            DomPatch::Redirect { url } if url == "/admin/orders/9"
        )));

        let update = page.edit_product(ProductId::new(3));
        assert!(update.patches.iter().any(|p| matches!(
            p,
            DomPatch::Redirect { url } if url == "/admin/products/edit/3"
        )));
    }

    #[tokio::test]
    async fn test_tick_respects_the_refresh_interval() {
        let start = Instant::now();
        let mut page = DashboardPage::new(offline_api(), start);

        // Not due yet: no fetch is attempted at all.
        assert!(page.tick(start + Duration::from_secs(30)).await.is_none());
        // Due: the tick runs (the offline API yields empty updates, but the
        // timer re-arms).
        assert!(page.tick(start + Duration::from_secs(60)).await.is_some());
        assert!(page.tick(start + Duration::from_secs(61)).await.is_none());
    }

    #[test]
    fn test_unknown_chart_period_falls_back() {
        assert!(CHART_PERIODS.contains(&DEFAULT_CHART_DAYS));
    }
}
