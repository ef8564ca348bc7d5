//! Customer back-office page.
//!
//! List plus aggregate counters, a detail modal per customer, and deletion
//! gated by the shared confirmation modal. Deleting reloads both the list
//! and the counters from the server.

use tracing::{debug, warn};

use pawmart_core::dates::{format_date, format_datetime};
use pawmart_core::html::escape;
use pawmart_core::supersede::SequenceGuard;
use pawmart_core::ui::{Toast, UiUpdate};
use pawmart_core::{CustomerId, CustomerStatus};

use crate::api::customers::{CustomerDetail, CustomerStats, CustomerSummary};
use crate::api::AdminApi;

use super::confirm::Confirmation;

// Element ids the customers page carries.
const TABLE_BODY: &str = "customers-table-body";
const TABLE_WRAP: &str = "table-responsive";
const NO_DATA: &str = "no-data-message";
const SPINNER: &str = "loading-spinner";
const STATUS_FILTER: &str = "status-filter";
const ORDER_FILTER: &str = "order-filter";
const SEARCH_FILTER: &str = "search-filter";
const DETAIL_MODAL: &str = "customer-detail-modal";
const CONFIRM_MODAL: &str = "confirmation-modal";
const CONFIRM_MESSAGE: &str = "confirmation-message";
const STAT_TOTAL: &str = "total-customers";
const STAT_ACTIVE: &str = "active-customers";
const STAT_NEW: &str = "new-customers";
const STAT_VIP: &str = "vip-customers";

/// The second facet: whether the customer has ordered at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderActivityFilter {
    #[default]
    All,
    HasOrders,
    NoOrders,
}

impl OrderActivityFilter {
    fn matches(self, customer: &CustomerSummary) -> bool {
        match self {
            Self::All => true,
            Self::HasOrders => customer.total_orders > 0,
            Self::NoOrders => customer.total_orders == 0,
        }
    }
}

/// The three conjunctive facets over the customer list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilters {
    pub status: Option<CustomerStatus>,
    pub activity: OrderActivityFilter,
    /// Matches the id, name, or email, case-insensitively.
    pub search: String,
}

impl CustomerFilters {
    /// Whether a customer passes all active facets.
    #[must_use]
    pub fn matches(&self, customer: &CustomerSummary) -> bool {
        let matches_status = self.status.is_none_or(|status| customer.status == status);
        let matches_activity = self.activity.matches(customer);

        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || customer.id.to_string().contains(&needle)
            || customer.full_name.to_lowercase().contains(&needle)
            || customer
                .email
                .as_ref()
                .is_some_and(|email| email.to_lowercase().contains(&needle));

        matches_status && matches_activity && matches_search
    }
}

/// What the confirmation modal is waiting to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    DeleteCustomer(CustomerId),
}

/// Controller for the customer admin page.
pub struct CustomersPage {
    api: AdminApi,
    customers: Vec<CustomerSummary>,
    filters: CustomerFilters,
    current: Option<CustomerId>,
    pending: Option<Confirmation<PendingAction>>,
    loads: SequenceGuard,
}

impl CustomersPage {
    #[must_use]
    pub fn new(api: AdminApi) -> Self {
        Self {
            api,
            customers: Vec::new(),
            filters: CustomerFilters::default(),
            current: None,
            pending: None,
            loads: SequenceGuard::new(),
        }
    }

    /// The canonical list as last fetched.
    #[must_use]
    pub fn customers(&self) -> &[CustomerSummary] {
        &self.customers
    }

    /// The list after applying the active facets.
    #[must_use]
    pub fn filtered(&self) -> Vec<&CustomerSummary> {
        self.customers
            .iter()
            .filter(|c| self.filters.matches(c))
            .collect()
    }

    /// Fetch the aggregate counters.
    pub async fn load_stats(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        match self.api.customer_stats().await {
            Ok(stats) => render_stats(&mut update, stats),
            // Counters are decoration; a failure only logs.
            Err(e) => warn!(error = %e, "failed to load customer stats"),
        }
        update
    }

    /// Fetch the list and redraw the table.
    pub async fn load(&mut self) -> UiUpdate {
        let ticket = self.loads.issue();
        let mut update = UiUpdate::new();
        update.show(SPINNER);
        update.hide(TABLE_WRAP);

        match self.api.list_customers().await {
            Ok(customers) => {
                if !self.loads.admit(ticket) {
                    debug!("discarding superseded customer list response");
                    return UiUpdate::new();
                }
                self.customers = customers;
                self.render_table(&mut update);
            }
            Err(e) => {
                warn!(error = %e, "failed to load customers");
                update.toast(Toast::error(format!(
                    "Lỗi khi tải khách hàng: {}",
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

    pub fn set_status_filter(&mut self, status: Option<CustomerStatus>) -> UiUpdate {
        self.filters.status = status;
        self.rerender()
    }

    pub fn set_activity_filter(&mut self, activity: OrderActivityFilter) -> UiUpdate {
        self.filters.activity = activity;
        self.rerender()
    }

    pub fn search_input(&mut self, text: impl Into<String>) -> UiUpdate {
        self.filters.search = text.into();
        self.rerender()
    }

    /// Clear every facet and the filter controls.
    pub fn clear_filters(&mut self) -> UiUpdate {
        self.filters = CustomerFilters::default();
        let mut update = UiUpdate::new();
        update.set_value(STATUS_FILTER, "");
        update.set_value(ORDER_FILTER, "");
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
    // Detail modal
    // =========================================================================

    /// Fetch one customer and open the detail modal.
    pub async fn view_detail(&mut self, id: CustomerId) -> UiUpdate {
        let mut update = UiUpdate::new();
        match self.api.customer_detail(id).await {
            Ok(detail) => {
                self.current = Some(detail.id);
                render_detail(&mut update, &detail);
                update.open_modal(DETAIL_MODAL);
            }
            Err(e) => {
                warn!(error = %e, customer_id = %id, "failed to load customer detail");
                update.toast(Toast::error(format!(
                    "Lỗi khi tải chi tiết khách hàng: {}",
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

    // =========================================================================
    // Delete
    // =========================================================================

    /// Ask for confirmation before deleting a customer.
    pub fn request_delete(&mut self, id: CustomerId, name: &str) -> UiUpdate {
        let message = format!(
            "Bạn có chắc chắn muốn xóa khách hàng \"{name}\"?<br>\
             <small class=\"text-muted\">Hành động này không thể hoàn tác.</small>"
        );
        let mut update = UiUpdate::new();
        update.set_html(CONFIRM_MESSAGE, message.clone());
        update.open_modal(CONFIRM_MODAL);
        self.pending = Some(Confirmation::new(message, PendingAction::DeleteCustomer(id)));
        update
    }

    /// The delete button inside the detail modal.
    pub fn request_delete_current(&mut self) -> UiUpdate {
        let Some(id) = self.current else {
            return UiUpdate::new();
        };
        let Some(name) = self
            .customers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.full_name.clone())
        else {
            return UiUpdate::new();
        };
        self.request_delete(id, &name)
    }

    /// Execute the pending action, then reload list and counters.
    pub async fn confirm(&mut self) -> UiUpdate {
        let mut update = UiUpdate::new();
        update.close_modal(CONFIRM_MODAL);

        let Some(pending) = self.pending.take() else {
            return update;
        };
        let PendingAction::DeleteCustomer(id) = pending.into_action();

        match self.api.delete_customer(id).await {
            Ok(()) => {
                update.toast(Toast::success("Xóa khách hàng thành công"));
                update.merge(self.close_detail());
                update.merge(self.load().await);
                update.merge(self.load_stats().await);
            }
            Err(e) => {
                warn!(error = %e, customer_id = %id, "failed to delete customer");
                update.toast(Toast::error(format!(
                    "Lỗi khi xóa khách hàng: {}",
                    e.user_message()
                )));
            }
        }
        update
    }

    /// Drop the pending action (cancel button or outside click).
    pub fn dismiss_confirmation(&mut self) -> UiUpdate {
        self.pending = None;
        let mut update = UiUpdate::new();
        update.close_modal(CONFIRM_MODAL);
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
        update.set_html(TABLE_BODY, render_customer_rows(&filtered));
    }
}

fn render_stats(update: &mut UiUpdate, stats: CustomerStats) {
    update.set_text(STAT_TOTAL, stats.total.to_string());
    update.set_text(STAT_ACTIVE, stats.active.to_string());
    update.set_text(STAT_NEW, stats.new_this_month.to_string());
    update.set_text(STAT_VIP, stats.vip.to_string());
}

/// Render the table body, one row per customer.
#[must_use]
pub fn render_customer_rows(customers: &[&CustomerSummary]) -> String {
    customers
        .iter()
        .map(|customer| {
            let money_class = if customer.total_spent.is_positive() {
                "money"
            } else {
                "money zero"
            };
            format!(
                "<tr>\
                 <td>#{id}</td>\
                 <td>{name}</td>\
                 <td>{email}</td>\
                 <td>{phone}</td>\
                 <td><span class=\"text-primary fw-bold\">{orders}</span></td>\
                 <td><span class=\"{money_class}\">{spent}</span></td>\
                 <td><span class=\"status-badge status-{status}\">{status_label}</span></td>\
                 <td><div class=\"action-buttons\">\
                 <button class=\"btn btn-sm btn-outline-primary\" data-action=\"view\" data-id=\"{id}\"><i class=\"fas fa-eye\"></i> Xem</button>\
                 <button class=\"btn btn-sm btn-outline-danger\" data-action=\"delete\" data-id=\"{id}\"><i class=\"fas fa-trash\"></i> Xóa</button>\
                 </div></td>\
                 </tr>",
                id = customer.id,
                name = escape(&customer.full_name),
                email = escape(customer.email.as_deref().unwrap_or("N/A")),
                phone = escape(customer.phone.as_deref().unwrap_or("N/A")),
                orders = customer.total_orders,
                money_class = money_class,
                spent = customer.total_spent.display(),
                status = customer.status,
                status_label = customer.status.label(),
            )
        })
        .collect()
}

fn render_detail(update: &mut UiUpdate, customer: &CustomerDetail) {
    update.set_text("modal-customer-id", customer.id.to_string());
    update.set_text("modal-customer-name", non_empty(&customer.full_name));
    update.set_text(
        "modal-customer-email",
        customer.email.as_deref().unwrap_or("N/A"),
    );
    update.set_text(
        "modal-customer-phone",
        customer.phone.as_deref().unwrap_or("N/A"),
    );
    update.set_text(
        "modal-customer-birth",
        customer.birth_date.as_deref().unwrap_or("N/A"),
    );
    update.set_text(
        "modal-customer-gender",
        gender_label(customer.gender.as_deref()),
    );
    update.set_text(
        "modal-customer-address",
        customer.address.as_deref().unwrap_or("N/A"),
    );
    update.set_text("modal-total-orders", customer.total_orders.to_string());
    update.set_text("modal-total-spent", customer.total_spent.display());
    update.set_text(
        "modal-last-order",
        customer
            .last_order_date
            .as_deref()
            .map_or_else(|| "Chưa có đơn hàng".to_string(), format_datetime),
    );
    update.set_html(
        "modal-customer-status",
        format!(
            "<span class=\"status-badge status-{}\">{}</span>",
            customer.status,
            customer.status.label()
        ),
    );
    update.set_html(
        "modal-customer-orders",
        render_recent_orders(&customer.recent_orders),
    );
}

fn render_recent_orders(orders: &[crate::api::customers::CustomerOrder]) -> String {
    if orders.is_empty() {
        return "<tr><td colspan=\"4\" class=\"no-orders\">Chưa có đơn hàng nào</td></tr>"
            .to_string();
    }
    orders
        .iter()
        .map(|order| {
            format!(
                "<tr>\
                 <td>#{id}</td>\
                 <td>{date}</td>\
                 <td>{total}</td>\
                 <td><span class=\"{badge}\">{label}</span></td>\
                 </tr>",
                id = order.id,
                date = format_date(&order.date),
                total = order.total.display(),
                badge = order.status.badge_class(),
                label = order.status.label(),
            )
        })
        .collect()
}

fn gender_label(gender: Option<&str>) -> &'static str {
    match gender {
        Some("M") => "Nam",
        Some("F") => "Nữ",
        _ => "Không xác định",
    }
}

fn non_empty(value: &str) -> &str {
    if value.is_empty() { "N/A" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pawmart_core::Price;

    fn customer(
        id: i64,
        name: &str,
        email: Option<&str>,
        orders: i64,
        status: CustomerStatus,
    ) -> CustomerSummary {
        CustomerSummary {
            id: CustomerId::new(id),
            full_name: name.to_string(),
            email: email.map(String::from),
            phone: None,
            total_orders: orders,
            total_spent: Price::from_vnd(orders * 200_000),
            status,
        }
    }

    fn sample_customers() -> Vec<CustomerSummary> {
        vec![
            customer(7, "Nguyen Van A", Some("a@example.com"), 3, CustomerStatus::Active),
            customer(8, "Tran Thi B", Some("b@example.com"), 0, CustomerStatus::Active),
            customer(12, "Le Van C", None, 5, CustomerStatus::Inactive),
        ]
    }

    #[test]
    fn test_filters_combine_conjunctively() {
        let customers = sample_customers();
        let filters = CustomerFilters {
            status: Some(CustomerStatus::Active),
            activity: OrderActivityFilter::HasOrders,
            search: "nguyen".to_string(),
        };
        let matched: Vec<&CustomerSummary> =
            customers.iter().filter(|c| filters.matches(c)).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched.first().map(|c| c.id), Some(CustomerId::new(7)));
    }

    #[test]
    fn test_search_matches_id_name_or_email() {
        let customers = sample_customers();
        for (needle, expected) in [("12", 1), ("tran", 1), ("b@example", 1), ("example.com", 2)] {
            let filters = CustomerFilters {
                search: needle.to_string(),
                ..CustomerFilters::default()
            };
            assert_eq!(
                customers.iter().filter(|c| filters.matches(c)).count(),
                expected,
                "needle {needle:?}"
            );
        }
    }

    #[test]
    fn test_activity_filter() {
        let customers = sample_customers();
        let has = CustomerFilters {
            activity: OrderActivityFilter::HasOrders,
            ..CustomerFilters::default()
        };
        let none = CustomerFilters {
            activity: OrderActivityFilter::NoOrders,
            ..CustomerFilters::default()
        };
        assert_eq!(customers.iter().filter(|c| has.matches(c)).count(), 2);
        assert_eq!(customers.iter().filter(|c| none.matches(c)).count(), 1);
    }

    #[test]
    fn test_rows_render_missing_contact_as_na() {
        let customers = sample_customers();
        let rows: Vec<&CustomerSummary> = customers.iter().collect();
        let html = render_customer_rows(&rows);
        assert!(html.contains("N/A"));
        assert!(html.contains("#7"));
        assert!(html.contains("data-action=\"delete\" data-id=\"7\""));
    }

    #[test]
    fn test_zero_spend_gets_zero_class() {
        let customers = sample_customers();
        let rows: Vec<&CustomerSummary> = customers.iter().collect();
        let html = render_customer_rows(&rows);
        assert!(html.contains("money zero"));
    }

    #[test]
    fn test_gender_labels() {
        assert_eq!(gender_label(Some("M")), "Nam");
        assert_eq!(gender_label(Some("F")), "Nữ");
        assert_eq!(gender_label(None), "Không xác định");
        assert_eq!(gender_label(Some("X")), "Không xác định");
    }

    #[test]
    fn test_recent_orders_empty_placeholder() {
        let html = render_recent_orders(&[]);
        assert!(html.contains("Chưa có đơn hàng nào"));
    }
}
