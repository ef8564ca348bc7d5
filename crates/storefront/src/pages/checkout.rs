//! Checkout page.
//!
//! Pure client-side preview arithmetic over the rendered line items: the
//! running total is Σ price × quantity of the checked rows, steppers clamp
//! to `[1, max]`, and the submit button stays disabled while nothing is
//! selected. Authoritative pricing is recomputed server-side after the
//! full-form POST.

use pawmart_core::ui::{MessageDialog, ToastKind, UiUpdate};
use pawmart_core::{AddressId, Price, ProductId};

// Element ids the checkout page carries.
const SELECTED_COUNT: &str = "selected-count";
const SELECTED_ITEMS_COUNT: &str = "selected-items-count";
const SUBTOTAL: &str = "subtotal";
const TOTAL_AMOUNT: &str = "total-amount";
const CONFIRM_BUTTON: &str = "confirm-btn";

fn line_subtotal_id(product_id: ProductId) -> String {
    format!("item-subtotal-{product_id}")
}

fn quantity_input_id(product_id: ProductId) -> String {
    format!("quantity-input-{product_id}")
}

/// Stepper direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increase,
    Decrease,
}

/// One selectable line on the page, seeded from its data attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub price: Price,
    /// Per-item cap, server-provided.
    pub max_quantity: i64,
    pub quantity: i64,
    pub checked: bool,
}

impl CheckoutLine {
    fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// The form fields a confirmed submission injects before the POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    pub address_id: AddressId,
    /// Selected `(product, quantity)` pairs, in page order.
    pub items: Vec<(ProductId, i64)>,
}

impl OrderSubmission {
    /// The hidden inputs, as `name=value` pairs.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("address_id".to_string(), self.address_id.to_string())];
        for (product_id, quantity) in &self.items {
            fields.push(("selected_products[]".to_string(), product_id.to_string()));
            fields.push(("selected_quantities[]".to_string(), quantity.to_string()));
        }
        fields
    }
}

/// Controller for the checkout page.
pub struct CheckoutPage {
    lines: Vec<CheckoutLine>,
    address: Option<AddressId>,
}

impl CheckoutPage {
    /// Build from the rendered lines; emits the initial summary with
    /// [`Self::summary`].
    #[must_use]
    pub fn new(lines: Vec<CheckoutLine>) -> Self {
        Self {
            lines,
            address: None,
        }
    }

    /// The lines as currently known.
    #[must_use]
    pub fn lines(&self) -> &[CheckoutLine] {
        &self.lines
    }

    /// The preview total over the checked lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines
            .iter()
            .filter(|l| l.checked)
            .fold(Price::ZERO, |sum, l| sum + l.line_total())
    }

    /// How many lines are checked.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.lines.iter().filter(|l| l.checked).count()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// A line checkbox changed.
    pub fn toggle_line(&mut self, product_id: ProductId, checked: bool) -> UiUpdate {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.checked = checked;
        }
        self.summary()
    }

    /// The select-all checkbox changed.
    pub fn select_all(&mut self, checked: bool) -> UiUpdate {
        for line in &mut self.lines {
            line.checked = checked;
        }
        self.summary()
    }

    /// Pick the delivery address.
    pub fn select_address(&mut self, address_id: AddressId) {
        self.address = Some(address_id);
    }

    // =========================================================================
    // Quantity
    // =========================================================================

    /// A `+`/`-` stepper click; clamps to `[1, max]`.
    pub fn step_quantity(&mut self, product_id: ProductId, step: Step) -> UiUpdate {
        let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) else {
            return UiUpdate::new();
        };
        let quantity = match step {
            Step::Increase => (line.quantity + 1).min(line.max_quantity),
            Step::Decrease => (line.quantity - 1).max(1),
        };
        line.quantity = quantity;

        let mut update = UiUpdate::new();
        update.set_value(quantity_input_id(product_id), quantity.to_string());
        update.set_text(line_subtotal_id(product_id), line.line_total().display());
        update.merge(self.summary());
        update
    }

    /// A value typed into the input; snapped to the nearest bound on
    /// change, junk becomes one.
    pub fn set_quantity(&mut self, product_id: ProductId, value: &str) -> UiUpdate {
        let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) else {
            return UiUpdate::new();
        };
        let quantity = value
            .trim()
            .parse::<i64>()
            .unwrap_or(1)
            .clamp(1, line.max_quantity);
        line.quantity = quantity;

        let mut update = UiUpdate::new();
        update.set_value(quantity_input_id(product_id), quantity.to_string());
        update.set_text(line_subtotal_id(product_id), line.line_total().display());
        update.merge(self.summary());
        update
    }

    // =========================================================================
    // Summary and submission
    // =========================================================================

    /// Redraw the order summary and gate the submit button.
    #[must_use]
    pub fn summary(&self) -> UiUpdate {
        let count = self.selected_count();
        let total = self.total();

        let mut update = UiUpdate::new();
        update.set_text(SELECTED_COUNT, count.to_string());
        update.set_text(SELECTED_ITEMS_COUNT, count.to_string());
        update.set_text(SUBTOTAL, total.display());
        update.set_text(TOTAL_AMOUNT, total.display());
        update.set_disabled(CONFIRM_BUTTON, count == 0);
        update
    }

    /// Validate the selection and build the submission for the host form.
    ///
    /// Returns the patches to apply plus the submission when the guards
    /// pass and the user confirms; `None` otherwise.
    pub fn submit(
        &self,
        confirm: impl FnOnce(&str) -> bool,
    ) -> (UiUpdate, Option<OrderSubmission>) {
        let mut update = UiUpdate::new();

        let items: Vec<(ProductId, i64)> = self
            .lines
            .iter()
            .filter(|l| l.checked)
            .map(|l| (l.product_id, l.quantity))
            .collect();

        if items.is_empty() {
            update.dialog(MessageDialog::new(
                ToastKind::Warning,
                "Thông báo",
                "Vui lòng chọn ít nhất một sản phẩm để đặt hàng!",
            ));
            return (update, None);
        }

        let Some(address_id) = self.address else {
            update.dialog(MessageDialog::new(
                ToastKind::Warning,
                "Thông báo",
                "Vui lòng chọn địa chỉ giao hàng!",
            ));
            return (update, None);
        };

        let message = format!(
            "Bạn có chắc chắn muốn đặt hàng {} sản phẩm đã chọn?",
            items.len()
        );
        if !confirm(&message) {
            return (UiUpdate::new(), None);
        }

        update.set_disabled(CONFIRM_BUTTON, true);
        update.set_text(CONFIRM_BUTTON, "Đang xử lý...");
        (update, Some(OrderSubmission { address_id, items }))
    }
}
