//! Order back-office page.
//!
//! List plus aggregate counters, a detail modal, and a status dropdown in
//! the modal. A status change PUTs the new value and then reloads list and
//! counters; nothing is updated optimistically.

use tracing::{debug, warn};

use pawmart_core::dates::format_datetime;
use pawmart_core::html::escape;
use pawmart_core::supersede::SequenceGuard;
use pawmart_core::ui::{Toast, UiUpdate};
use pawmart_core::{OrderId, OrderStatus};

use crate::api::orders::{OrderDetail, OrderStats, OrderSummary};
use crate::api::AdminApi;

// Element ids the orders page carries.
const TABLE_BODY: &str = "orders-table-body";
const TABLE_WRAP: &str = "table-responsive";
const NO_DATA: &str = "no-data-message";
const SPINNER: &str = "loading-spinner";
const STATUS_FILTER: &str = "status-filter";
const DATE_FILTER: &str = "date-filter";
const SEARCH_FILTER: &str = "search-filter";
const DETAIL_MODAL: &str = "order-detail-modal";
const STATUS_SELECT: &str = "modal-status-select";
const STAT_TOTAL: &str = "total-orders";
const STAT_PENDING: &str = "pending-orders";
const STAT_SHIPPED: &str = "shipped-orders";
const STAT_DELIVERED: &str = "delivered-orders";

/// The three conjunctive facets over the order list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilters {
    pub status: Option<OrderStatus>,
    /// Date prefix (`yyyy-mm-dd` from the date input).
    pub date: String,
    /// Matches the id or the customer name, case-insensitively.
    pub search: String,
}

impl OrderFilters {
    /// Whether an order passes all active facets.
    #[must_use]
    pub fn matches(&self, order: &OrderSummary) -> bool {
        let matches_status = self.status.is_none_or(|status| order.status == status);
        let matches_date = self.date.is_empty() || order.date.starts_with(&self.date);

        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || order.id.to_string().contains(&needle)
            || order.customer_name.to_lowercase().contains(&needle);

        matches_status && matches_date && matches_search
    }
}

/// Controller for the order admin page.
pub struct OrdersPage {
    api: AdminApi,
    orders: Vec<OrderSummary>,
    filters: OrderFilters,
    current: Option<OrderId>,
    loads: SequenceGuard,
}

impl OrdersPage {
    #[must_use]
    pub fn new(api: AdminApi) -> Self {
        Self {
            api,
            orders: Vec::new(),
            filters: OrderFilters::default(),
            current: None,
            loads: SequenceGuard::new(),
        }
    }

    /// The canonical list as last fetched.
    #[must_use]
    pub fn orders(&self) -> &[OrderSummary] {
        &self.orders
    }

    /// The list after applying the active facets.
    #[must_use]
    pub fn filtered(&self) -> Vec<&OrderSummary> {
        self.orders
            .iter()
            .filter(|o| self.filters.matches(o))
            .collect()
    }

    /// The order whose detail modal is open, if any.
    #[must_use]
    pub const fn current_order(&self) -> Option<OrderId> {
        self.current
    }

    /// Fetch the aggregate counters.
    pub async fn load_stats(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        match self.api.order_stats().await {
            Ok(stats) => render_stats(&mut update, stats),
            // Counters are decoration; a failure only logs.
            Err(e) => warn!(error = %e, "failed to load order stats"),
        }
        update
    }

    /// Fetch the list and redraw the table.
    pub async fn load(&mut self) -> UiUpdate {
        let ticket = self.loads.issue();
        let mut update = UiUpdate::new();
        update.show(SPINNER);
        update.hide(TABLE_WRAP);

        match self.api.list_orders().await {
            Ok(orders) => {
                if !self.loads.admit(ticket) {
                    debug!("discarding superseded order list response");
                    return UiUpdate::new();
                }
                self.orders = orders;
                self.render_table(&mut update);
            }
            Err(e) => {
                warn!(error = %e, "failed to load orders");
                update.toast(Toast::error(format!(
                    "Lỗi khi tải đơn hàng: {}",
                    e.user_message()
                )));
            }
        }

        update.hide(SPINNER);
        update.show(TABLE_WRAP);
        update
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    pub fn set_status_filter(&mut self, status: Option<OrderStatus>) -> UiUpdate {
        self.filters.status = status;
        self.rerender()
    }

    pub fn set_date_filter(&mut self, date: impl Into<String>) -> UiUpdate {
        self.filters.date = date.into();
        self.rerender()
    }

    pub fn search_input(&mut self, text: impl Into<String>) -> UiUpdate {
        self.filters.search = text.into();
        self.rerender()
    }

    /// Clear every facet and the filter controls.
    pub fn clear_filters(&mut self) -> UiUpdate {
        self.filters = OrderFilters::default();
        let mut update = UiUpdate::new();
        update.set_value(STATUS_FILTER, "");
        update.set_value(DATE_FILTER, "");
        update.set_value(SEARCH_FILTER, "");
        self.render_table(&mut update);
        update
    }

    /// Reload list and counters on the refresh button.
    pub async fn refresh(&mut self) -> UiUpdate {
        let mut update = self.load().await;
        update.merge(self.load_stats().await);
        update.toast(Toast::success("Đã làm mới dữ liệu"));
        update
    }

    // =========================================================================
    // Detail modal and status update
    // =========================================================================

    /// Fetch one order and open the detail modal.
    pub async fn view_detail(&mut self, id: OrderId) -> UiUpdate {
        let mut update = UiUpdate::new();
        match self.api.order_detail(id).await {
            Ok(detail) => {
                self.current = Some(detail.id);
                render_detail(&mut update, &detail);
                update.open_modal(DETAIL_MODAL);
            }
            Err(e) => {
                warn!(error = %e, order_id = %id, "failed to load order detail");
                update.toast(Toast::error(format!(
                    "Lỗi khi tải chi tiết đơn hàng: {}",
                    e.user_message()
                )));
            }
        }
        update
    }

    /// Close the detail modal (close button or outside click).
    pub fn close_detail(&mut self) -> UiUpdate {
        self.current = None;
        let mut update = UiUpdate::new();
        update.close_modal(DETAIL_MODAL);
        update
    }

    /// PUT the status picked in the modal dropdown, then reload everything.
    pub async fn update_status(&mut self, status: OrderStatus) -> UiUpdate {
        let Some(id) = self.current else {
            return UiUpdate::new();
        };

        let mut update = UiUpdate::new();
        match self.api.update_order_status(id, status).await {
            Ok(()) => {
                update.toast(Toast::success("Cập nhật trạng thái thành công"));
                update.merge(self.close_detail());
                update.merge(self.load().await);
                update.merge(self.load_stats().await);
            }
            Err(e) => {
                warn!(error = %e, order_id = %id, "failed to update order status");
                update.toast(Toast::error(format!(
                    "Lỗi khi cập nhật trạng thái: {}",
                    e.user_message()
                )));
            }
        }
        update
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn rerender(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        self.render_table(&mut update);
        update
    }

    fn render_table(&self, update: &mut UiUpdate) {
        let filtered = self.filtered();
        if filtered.is_empty() {
            update.set_html(TABLE_BODY, "");
            update.hide(TABLE_WRAP);
            update.show(NO_DATA);
            return;
        }
        update.hide(NO_DATA);
        update.show(TABLE_WRAP);
        update.set_html(TABLE_BODY, render_order_rows(&filtered));
    }
}

fn render_stats(update: &mut UiUpdate, stats: OrderStats) {
    update.set_text(STAT_TOTAL, stats.total.to_string());
    update.set_text(STAT_PENDING, stats.pending.to_string());
    update.set_text(STAT_SHIPPED, stats.shipped.to_string());
    update.set_text(STAT_DELIVERED, stats.delivered.to_string());
}

/// Render the table body, one row per order.
#[must_use]
pub fn render_order_rows(orders: &[&OrderSummary]) -> String {
    orders
        .iter()
        .map(|order| {
            format!(
                "<tr>\
                 <td>#{id}</td>\
                 <td>{name}</td>\
                 <td>{date}</td>\
                 <td>{total}</td>\
                 <td><span class=\"{badge}\">{label}</span></td>\
                 <td><button class=\"btn btn-sm btn-outline-primary\" data-action=\"view\" data-id=\"{id}\"><i class=\"fas fa-eye\"></i> Xem</button></td>\
                 </tr>",
                id = order.id,
                name = escape(&order.customer_name),
                date = format_datetime(&order.date),
                total = order.total.display(),
                badge = order.status.badge_class(),
                label = order.status.label(),
            )
        })
        .collect()
}

fn render_detail(update: &mut UiUpdate, order: &OrderDetail) {
    update.set_text("modal-order-id", order.id.to_string());
    update.set_text(
        "modal-customer-name",
        order.customer.name.as_deref().unwrap_or("N/A"),
    );
    update.set_text(
        "modal-customer-email",
        order.customer.email.as_deref().unwrap_or("N/A"),
    );
    update.set_text(
        "modal-customer-phone",
        order.customer.phone.as_deref().unwrap_or("N/A"),
    );
    update.set_text(
        "modal-receiver-name",
        order.shipping.receiver_name.as_deref().unwrap_or("N/A"),
    );
    update.set_text(
        "modal-shipping-address",
        order.shipping.address.as_deref().unwrap_or("N/A"),
    );
    update.set_text(
        "modal-receiver-phone",
        order.shipping.phone.as_deref().unwrap_or("N/A"),
    );
    update.set_text("modal-total-amount", order.total.display());
    update.set_value(STATUS_SELECT, order.status.as_str());
    update.set_html("modal-order-items", render_line_items(order));
}

fn render_line_items(order: &OrderDetail) -> String {
    order
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr>\
                 <td>{name}</td>\
                 <td>{quantity}</td>\
                 <td>{price}</td>\
                 <td>{line_total}</td>\
                 </tr>",
                name = escape(&item.product_name),
                quantity = item.quantity,
                price = item.price.display(),
                line_total = (item.price * item.quantity).display(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pawmart_core::Price;

    use crate::api::orders::{OrderCustomer, OrderLineItem, ShippingInfo};

    fn order(id: i64, name: &str, date: &str, status: OrderStatus) -> OrderSummary {
        OrderSummary {
            id: OrderId::new(id),
            customer_name: name.to_string(),
            date: date.to_string(),
            total: Price::from_vnd(450_000),
            status,
        }
    }

    fn sample_orders() -> Vec<OrderSummary> {
        vec![
            order(101, "Nguyen Van A", "2025-03-14 09:05:00", OrderStatus::Pending),
            order(102, "Tran Thi B", "2025-03-14 15:40:00", OrderStatus::Shipped),
            order(103, "Le Van C", "2025-03-15 08:00:00", OrderStatus::Cancelled),
        ]
    }

    #[test]
    fn test_date_filter_is_a_prefix_match() {
        let orders = sample_orders();
        let filters = OrderFilters {
            date: "2025-03-14".to_string(),
            ..OrderFilters::default()
        };
        assert_eq!(orders.iter().filter(|o| filters.matches(o)).count(), 2);
    }

    #[test]
    fn test_status_and_search_combine() {
        let orders = sample_orders();
        let filters = OrderFilters {
            status: Some(OrderStatus::Shipped),
            search: "tran".to_string(),
            ..OrderFilters::default()
        };
        let matched: Vec<&OrderSummary> = orders.iter().filter(|o| filters.matches(o)).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched.first().map(|o| o.id), Some(OrderId::new(102)));
    }

    #[test]
    fn test_search_matches_order_id() {
        let orders = sample_orders();
        let filters = OrderFilters {
            search: "103".to_string(),
            ..OrderFilters::default()
        };
        assert_eq!(orders.iter().filter(|o| filters.matches(o)).count(), 1);
    }

    #[test]
    fn test_rows_render_status_badge_and_formatted_date() {
        let orders = sample_orders();
        let rows: Vec<&OrderSummary> = orders.iter().collect();
        let html = render_order_rows(&rows);
        assert!(html.contains("status-badge status-pending"));
        assert!(html.contains("status-badge status-cancelled"));
        assert!(html.contains("14/03/2025 09:05"));
        assert!(html.contains("450.000₫"));
    }

    #[test]
    fn test_line_items_multiply_price_by_quantity() {
        let detail = OrderDetail {
            id: OrderId::new(101),
            customer: OrderCustomer {
                name: Some("Nguyen Van A".to_string()),
                email: None,
                phone: None,
            },
            shipping: ShippingInfo {
                receiver_name: None,
                address: None,
                phone: None,
            },
            items: vec![OrderLineItem {
                product_name: "Hạt Royal Canin".to_string(),
                quantity: 3,
                price: Price::from_vnd(185_000),
            }],
            total: Price::from_vnd(555_000),
            status: OrderStatus::Pending,
        };
        let html = render_line_items(&detail);
        assert!(html.contains("185.000₫"));
        assert!(html.contains("555.000₫"));
    }
}
