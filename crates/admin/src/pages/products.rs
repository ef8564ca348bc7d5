//! Product back-office page.
//!
//! Loads the full product list once per page, filters it in memory, and
//! re-renders the table from scratch on every filter change. Mutations
//! (save, delete) go to the server and are followed by a full reload
//! rather than patching rows locally.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use pawmart_core::html::escape;
use pawmart_core::supersede::SequenceGuard;
use pawmart_core::timing::Debouncer;
use pawmart_core::ui::{MessageDialog, ToastKind, UiUpdate};
use pawmart_core::{CategoryId, Price, ProductId, StockStatus};

use crate::api::products::{ProductPayload, ProductRecord};
use crate::api::AdminApi;

use super::confirm::Confirmation;

// Element ids the products page carries.
const TABLE_BODY: &str = "productsTableBody";
const SEARCH_INPUT: &str = "searchInput";
const CATEGORY_FILTER: &str = "categoryFilter";
const STATUS_FILTER: &str = "statusFilter";
const SELECT_ALL: &str = "selectAll";
const BULK_ACTIONS: &str = "bulkActions";
const PRODUCT_MODAL: &str = "productModal";
const MODAL_TITLE: &str = "productModalTitle";
const SAVE_BUTTON: &str = "productSubmitBtn";
const CONFIRM_MODAL: &str = "confirmation-modal";
const CONFIRM_MESSAGE: &str = "confirmation-message";
const STAT_TOTAL: &str = "totalProducts";
const STAT_IN_STOCK: &str = "inStockProducts";
const STAT_LOW_STOCK: &str = "lowStockProducts";
const STAT_OUT_OF_STOCK: &str = "outOfStockProducts";

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// The shop's category table. Category ids are what the save form posts;
/// the list endpoint only carries names.
const CATEGORIES: &[(i64, &str)] = &[
    (1, "Thức ăn cho chó"),
    (2, "Thức ăn cho mèo"),
    (3, "Phụ kiện cho chó"),
    (4, "Phụ kiện cho mèo"),
    (5, "Thuốc & Vitamin"),
];

/// Resolve a category name to its form id; unknown names fall back to the
/// first category, as the original mapping did.
#[must_use]
pub fn category_id_by_name(name: &str) -> CategoryId {
    CATEGORIES
        .iter()
        .find(|(_, n)| *n == name)
        .map_or(CategoryId::new(1), |(id, _)| CategoryId::new(*id))
}

/// Badge class for a category cell.
fn category_badge_class(name: &str) -> &'static str {
    match name {
        "Thức ăn cho mèo" => "bg-info",
        "Phụ kiện cho chó" => "bg-secondary",
        "Phụ kiện cho mèo" => "bg-dark",
        "Thuốc & Vitamin" => "bg-warning",
        _ => "bg-primary",
    }
}

/// A product as the table shows it: the server record plus the derived
/// stock status and resolved category id.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminProduct {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub category_id: CategoryId,
    pub brand: String,
    pub price: Price,
    pub quantity: i64,
    pub status: StockStatus,
    pub description: String,
}

impl From<ProductRecord> for AdminProduct {
    fn from(record: ProductRecord) -> Self {
        let category_id = category_id_by_name(&record.category);
        Self {
            id: record.id,
            name: record.name,
            category: record.category,
            category_id,
            brand: record.brand.unwrap_or_default(),
            price: record.price,
            status: StockStatus::from_quantity(record.quantity),
            quantity: record.quantity,
            description: record.description.unwrap_or_default(),
        }
    }
}

/// The three conjunctive facets over the product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    /// Case-insensitive substring over name, brand, and description.
    pub search: String,
    pub category: Option<CategoryId>,
    pub status: Option<StockStatus>,
}

impl ProductFilters {
    /// Whether a product passes all active facets.
    #[must_use]
    pub fn matches(&self, product: &AdminProduct) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || product.name.to_lowercase().contains(&needle)
            || product.brand.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle);

        let matches_category = self
            .category
            .is_none_or(|category| product.category_id == category);

        let matches_status = self.status.is_none_or(|status| product.status == status);

        matches_search && matches_category && matches_status
    }
}

/// The product editor form as submitted.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub category_id: Option<CategoryId>,
    pub brand: String,
    pub cost: Price,
    pub import_price: Price,
    pub price: Price,
    pub quantity: i64,
    pub description: String,
    pub image_url: Option<String>,
    pub image: Option<crate::api::products::ImageUpload>,
}

impl ProductForm {
    /// Client-side validation; a failure blocks the request entirely.
    ///
    /// # Errors
    ///
    /// Returns the localized alert text when the name is empty, no category
    /// is selected, the price is not positive, or the quantity is negative.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty()
            || self.category_id.is_none()
            || !self.price.is_positive()
            || self.quantity < 0
        {
            return Err("Vui lòng điền đầy đủ thông tin bắt buộc!".to_string());
        }
        Ok(())
    }
}

/// Controller for the product admin page.
pub struct ProductsPage {
    api: AdminApi,
    products: Vec<AdminProduct>,
    filters: ProductFilters,
    editing: Option<ProductId>,
    selected: BTreeSet<ProductId>,
    pending_delete: Option<Confirmation<ProductId>>,
    search_debounce: Debouncer,
    loads: SequenceGuard,
}

impl ProductsPage {
    #[must_use]
    pub fn new(api: AdminApi) -> Self {
        Self {
            api,
            products: Vec::new(),
            filters: ProductFilters::default(),
            editing: None,
            selected: BTreeSet::new(),
            pending_delete: None,
            search_debounce: Debouncer::new(SEARCH_DEBOUNCE),
            loads: SequenceGuard::new(),
        }
    }

    /// The canonical list as last fetched.
    #[must_use]
    pub fn products(&self) -> &[AdminProduct] {
        &self.products
    }

    /// The list after applying the active facets.
    #[must_use]
    pub fn filtered(&self) -> Vec<&AdminProduct> {
        self.products
            .iter()
            .filter(|p| self.filters.matches(p))
            .collect()
    }

    /// Fetch the list and redraw table and statistics.
    ///
    /// A response superseded by a newer load is discarded unrendered.
    pub async fn load(&mut self) -> UiUpdate {
        let ticket = self.loads.issue();
        let mut update = UiUpdate::new();

        match self.api.list_products().await {
            Ok(records) => {
                if !self.loads.admit(ticket) {
                    debug!("discarding superseded product list response");
                    return update;
                }
                self.products = records.into_iter().map(AdminProduct::from).collect();
                self.selected.clear();
                self.render_table(&mut update);
                self.render_statistics(&mut update);
            }
            Err(e) => {
                warn!(error = %e, "failed to load products");
                update.dialog(MessageDialog::new(
                    ToastKind::Error,
                    "Lỗi!",
                    format!("Không thể tải dữ liệu sản phẩm: {}", e.user_message()),
                ));
            }
        }
        update
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// A search keystroke; the redraw waits for the debounce window.
    pub fn search_input(&mut self, text: impl Into<String>, now: Instant) {
        self.filters.search = text.into();
        self.search_debounce.trigger(now);
    }

    /// Emit the pending search redraw once the quiet period has elapsed.
    pub fn poll_search(&mut self, now: Instant) -> Option<UiUpdate> {
        self.search_debounce.fire(now).then(|| {
            let mut update = UiUpdate::new();
            self.render_table(&mut update);
            update
        })
    }

    pub fn set_category_filter(&mut self, category: Option<CategoryId>) -> UiUpdate {
        self.filters.category = category;
        let mut update = UiUpdate::new();
        self.render_table(&mut update);
        update
    }

    pub fn set_status_filter(&mut self, status: Option<StockStatus>) -> UiUpdate {
        self.filters.status = status;
        let mut update = UiUpdate::new();
        self.render_table(&mut update);
        update
    }

    /// Clear every facet and the filter controls, restoring the full list.
    pub fn reset_filters(&mut self) -> UiUpdate {
        self.filters = ProductFilters::default();
        let mut update = UiUpdate::new();
        update.set_value(SEARCH_INPUT, "");
        update.set_value(CATEGORY_FILTER, "");
        update.set_value(STATUS_FILTER, "");
        self.render_table(&mut update);
        update
    }

    // =========================================================================
    // Editor modal
    // =========================================================================

    /// Open the editor, prefilled when an id is given.
    pub fn open_editor(&mut self, product_id: Option<ProductId>) -> UiUpdate {
        let mut update = UiUpdate::new();

        match product_id.and_then(|id| self.products.iter().find(|p| p.id == id)) {
            Some(product) => {
                self.editing = Some(product.id);
                update.set_text(MODAL_TITLE, "Chỉnh sửa sản phẩm");
                update.set_value("productName", product.name.clone());
                update.set_value("productCategory", product.category_id.to_string());
                update.set_value("productBrand", product.brand.clone());
                update.set_value("productSellPrice", product.price.amount().to_string());
                update.set_value("productQuantity", product.quantity.to_string());
                let availability =
                    if product.status == StockStatus::OutOfStock && product.quantity == 0 {
                        "0"
                    } else {
                        "1"
                    };
                update.set_value("productStatus", availability);
                update.set_value("productDescription", product.description.clone());
            }
            None => {
                self.editing = None;
                update.set_text(MODAL_TITLE, "Thêm sản phẩm mới");
                for field in [
                    "productName",
                    "productCategory",
                    "productBrand",
                    "productCost",
                    "productImportPrice",
                    "productSellPrice",
                    "productQuantity",
                    "productDescription",
                ] {
                    update.set_value(field, "");
                }
            }
        }

        update.open_modal(PRODUCT_MODAL);
        update
    }

    /// Validate and submit the editor form, then reload the list.
    ///
    /// Add and edit share the flow; only the target path differs, chosen by
    /// whether an edit id was set when the modal opened.
    pub async fn save(&mut self, form: ProductForm) -> UiUpdate {
        let mut update = UiUpdate::new();

        if let Err(message) = form.validate() {
            update.dialog(MessageDialog::new(ToastKind::Error, "Lỗi!", message));
            return update;
        }
        let Some(category_id) = form.category_id else {
            // validate() guarantees the category; unreachable in practice.
            return update;
        };

        update.set_disabled(SAVE_BUTTON, true);
        update.set_text(SAVE_BUTTON, "Đang lưu...");

        let payload = ProductPayload {
            name: form.name.trim().to_string(),
            category_id,
            brand: form.brand.trim().to_string(),
            price: form.price,
            quantity: form.quantity,
            description: form.description.trim().to_string(),
            cost: form.cost,
            import_price: form.import_price,
            image_url: form.image_url.clone(),
            image: form.image.clone(),
        };

        let was_editing = self.editing.is_some();
        match self.api.save_product(self.editing, &payload).await {
            Ok(()) => {
                update.close_modal(PRODUCT_MODAL);
                update.merge(self.load().await);
                let body = if was_editing {
                    "Sản phẩm đã được cập nhật."
                } else {
                    "Sản phẩm mới đã được thêm."
                };
                update.dialog(MessageDialog::new(ToastKind::Success, "Thành công!", body));
            }
            Err(e) => {
                warn!(error = %e, "failed to save product");
                update.dialog(MessageDialog::new(ToastKind::Error, "Lỗi!", e.user_message()));
            }
        }

        update.set_text(SAVE_BUTTON, "Lưu");
        update.set_disabled(SAVE_BUTTON, false);
        update
    }

    /// Show the read-only detail dialog for a row.
    #[must_use]
    pub fn view_product(&self, product_id: ProductId) -> UiUpdate {
        let mut update = UiUpdate::new();
        if let Some(product) = self.products.iter().find(|p| p.id == product_id) {
            update.dialog(MessageDialog::new(
                ToastKind::Info,
                product.name.clone(),
                render_product_detail(product),
            ));
        }
        update
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Ask for confirmation before deleting a row.
    pub fn request_delete(&mut self, product_id: ProductId) -> UiUpdate {
        let mut update = UiUpdate::new();
        let Some(product) = self.products.iter().find(|p| p.id == product_id) else {
            return update;
        };

        let message = format!(
            "Bạn có chắc chắn muốn xóa sản phẩm \"{}\"?",
            product.name
        );
        update.set_html(CONFIRM_MESSAGE, escape(&message));
        update.open_modal(CONFIRM_MODAL);
        self.pending_delete = Some(Confirmation::new(message, product_id));
        update
    }

    /// Execute the pending delete, then reload.
    pub async fn confirm_delete(&mut self) -> UiUpdate {
        let mut update = UiUpdate::new();
        update.close_modal(CONFIRM_MODAL);

        let Some(pending) = self.pending_delete.take() else {
            return update;
        };

        match self.api.delete_product(pending.into_action()).await {
            Ok(()) => {
                update.merge(self.load().await);
                update.dialog(MessageDialog::new(
                    ToastKind::Success,
                    "Đã xóa!",
                    "Sản phẩm đã được xóa thành công.",
                ));
            }
            Err(e) => {
                warn!(error = %e, "failed to delete product");
                update.dialog(MessageDialog::new(ToastKind::Error, "Lỗi!", e.user_message()));
            }
        }
        update
    }

    /// Drop the pending delete (cancel button or outside click).
    pub fn dismiss_confirmation(&mut self) -> UiUpdate {
        self.pending_delete = None;
        let mut update = UiUpdate::new();
        update.close_modal(CONFIRM_MODAL);
        update
    }

    // =========================================================================
    // Row selection and bulk actions
    // =========================================================================

    /// A row checkbox changed.
    pub fn toggle_row(&mut self, product_id: ProductId, checked: bool) -> UiUpdate {
        if checked {
            self.selected.insert(product_id);
        } else {
            self.selected.remove(&product_id);
        }
        self.render_bulk_bar()
    }

    /// The select-all checkbox changed; applies to the filtered rows.
    pub fn select_all(&mut self, checked: bool) -> UiUpdate {
        let visible: Vec<ProductId> = self.filtered().iter().map(|p| p.id).collect();
        let mut update = UiUpdate::new();
        for id in visible {
            if checked {
                self.selected.insert(id);
            } else {
                self.selected.remove(&id);
            }
            update.push(pawmart_core::ui::DomPatch::SetChecked {
                target: format!("row-checkbox-{id}"),
                checked,
            });
        }
        update.merge(self.render_bulk_bar());
        update
    }

    /// Currently selected row ids.
    #[must_use]
    pub fn selected(&self) -> &BTreeSet<ProductId> {
        &self.selected
    }

    fn render_bulk_bar(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        let visible = self.filtered().len();
        let checked = self.selected.len();

        if checked == 0 {
            update.push(pawmart_core::ui::DomPatch::SetIndeterminate {
                target: SELECT_ALL.to_string(),
                on: false,
            });
            update.push(pawmart_core::ui::DomPatch::SetChecked {
                target: SELECT_ALL.to_string(),
                checked: false,
            });
            update.hide(BULK_ACTIONS);
        } else {
            if checked == visible {
                update.push(pawmart_core::ui::DomPatch::SetIndeterminate {
                    target: SELECT_ALL.to_string(),
                    on: false,
                });
                update.push(pawmart_core::ui::DomPatch::SetChecked {
                    target: SELECT_ALL.to_string(),
                    checked: true,
                });
            } else {
                update.push(pawmart_core::ui::DomPatch::SetIndeterminate {
                    target: SELECT_ALL.to_string(),
                    on: true,
                });
            }
            update.show(BULK_ACTIONS);
        }
        update
    }

    /// Bulk delete is not wired up yet; the button shows a placeholder.
    #[must_use]
    pub fn bulk_delete(&self) -> UiUpdate {
        self.bulk_placeholder("Tính năng xóa hàng loạt sẽ được cập nhật trong phiên bản tiếp theo.")
    }

    /// Bulk stock update is not wired up yet; the button shows a placeholder.
    #[must_use]
    pub fn bulk_update_stock(&self) -> UiUpdate {
        self.bulk_placeholder(
            "Tính năng cập nhật số lượng hàng loạt sẽ được cập nhật trong phiên bản tiếp theo.",
        )
    }

    fn bulk_placeholder(&self, body: &str) -> UiUpdate {
        let mut update = UiUpdate::new();
        if self.selected.is_empty() {
            return update;
        }
        update.dialog(MessageDialog::new(
            ToastKind::Info,
            "Chức năng chưa hoàn thiện",
            body,
        ));
        update
    }

    /// Export of the selected rows; the file itself is simulated.
    #[must_use]
    pub fn bulk_export(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        if self.selected.is_empty() {
            return update;
        }
        update.dialog(MessageDialog::new(
            ToastKind::Success,
            "Xuất dữ liệu",
            format!("Đã xuất {} sản phẩm ra file Excel.", self.selected.len()),
        ));
        update
    }

    /// Export of the whole list; the file itself is simulated.
    #[must_use]
    pub fn export_all(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        update.dialog(MessageDialog::new(
            ToastKind::Success,
            "Xuất dữ liệu",
            "Đã xuất toàn bộ sản phẩm ra file Excel.",
        ));
        update
    }

    /// Import from a picked file; the parse itself is simulated.
    #[must_use]
    pub fn import_file(&self, file_name: &str) -> UiUpdate {
        let mut update = UiUpdate::new();
        update.dialog(MessageDialog::new(
            ToastKind::Success,
            "Nhập dữ liệu",
            format!("Đã nhập dữ liệu từ file: {file_name}"),
        ));
        update
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn render_table(&self, update: &mut UiUpdate) {
        update.set_html(TABLE_BODY, render_product_rows(&self.filtered()));
    }

    fn render_statistics(&self, update: &mut UiUpdate) {
        let count = |status: StockStatus| {
            self.products
                .iter()
                .filter(|p| p.status == status)
                .count()
                .to_string()
        };
        update.set_text(STAT_TOTAL, self.products.len().to_string());
        update.set_text(STAT_IN_STOCK, count(StockStatus::InStock));
        update.set_text(STAT_LOW_STOCK, count(StockStatus::LowStock));
        update.set_text(STAT_OUT_OF_STOCK, count(StockStatus::OutOfStock));
    }
}

/// Render the table body: one row per product, or the empty placeholder.
#[must_use]
pub fn render_product_rows(products: &[&AdminProduct]) -> String {
    if products.is_empty() {
        return "<tr>\
                <td colspan=\"9\" class=\"text-center py-4\">\
                <i class=\"fas fa-box-open fa-3x text-muted mb-3\"></i>\
                <p class=\"text-muted\">Không có sản phẩm nào được tìm thấy</p>\
                </td></tr>"
            .to_string();
    }

    products.iter().map(|p| render_product_row(p)).collect()
}

fn render_product_row(product: &AdminProduct) -> String {
    let qty_badge = if product.quantity == 0 {
        "bg-danger"
    } else if product.quantity <= StockStatus::LOW_STOCK_THRESHOLD {
        "bg-warning"
    } else {
        "bg-success"
    };
    let brand = if product.brand.is_empty() {
        "-".to_string()
    } else {
        escape(&product.brand)
    };

    format!(
        "<tr>\
         <td><input type=\"checkbox\" class=\"form-check-input row-checkbox\" \
         id=\"row-checkbox-{id}\" data-id=\"{id}\"></td>\
         <td>#SP{id:03}</td>\
         <td><span>{name}</span></td>\
         <td><span class=\"badge {category_badge}\">{category}</span></td>\
         <td>{brand}</td>\
         <td class=\"fw-bold text-primary\">{price}</td>\
         <td><span class=\"badge {qty_badge}\">{quantity}</span></td>\
         <td><span class=\"status-badge {status_badge}\">{status}</span></td>\
         <td><div class=\"action-buttons\">\
         <button class=\"btn btn-sm btn-outline-info\" data-action=\"view\" data-id=\"{id}\" title=\"Xem chi tiết\"><i class=\"fas fa-eye\"></i></button>\
         <button class=\"btn btn-sm btn-outline-primary\" data-action=\"edit\" data-id=\"{id}\" title=\"Chỉnh sửa\"><i class=\"fas fa-edit\"></i></button>\
         <button class=\"btn btn-sm btn-outline-danger\" data-action=\"delete\" data-id=\"{id}\" title=\"Xóa\"><i class=\"fas fa-trash\"></i></button>\
         </div></td>\
         </tr>",
        id = product.id.as_i64(),
        name = escape(&product.name),
        category_badge = category_badge_class(&product.category),
        category = escape(&product.category),
        brand = brand,
        price = product.price.display(),
        quantity = product.quantity,
        qty_badge = qty_badge,
        status_badge = product.status.badge_class(),
        status = product.status.label(),
    )
}

fn render_product_detail(product: &AdminProduct) -> String {
    let brand = if product.brand.is_empty() {
        "Không có"
    } else {
        &product.brand
    };
    let description = if product.description.is_empty() {
        "Không có mô tả"
    } else {
        &product.description
    };
    format!(
        "Loại: {}\nThương hiệu: {}\nGiá bán: {}\nSố lượng: {}\nTrạng thái: {}\nMô tả: {}",
        product.category,
        brand,
        product.price.display(),
        product.quantity,
        product.status.label(),
        description,
    )
}
