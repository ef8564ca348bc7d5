//! Cart page.
//!
//! Quantity changes and removals are server-confirmed: the touched row is
//! put in a loading state, the mutation posted, and on success only that
//! row's subtotal cell plus the shared aggregates are patched. On failure
//! the input rolls back to its prior value. Everything else on the page
//! stays as rendered.

use tracing::warn;

use pawmart_core::ui::{DomPatch, Toast, UiUpdate};
use pawmart_core::ProductId;

use crate::api::cart::CartTotals;
use crate::api::ShopApi;

// Element ids the cart page carries.
const SUBTOTAL: &str = "subtotal";
const TOTAL_AMOUNT: &str = "total-amount";
const DISCOUNT: &str = "discount";
const CART_BADGE: &str = "cart-badge";
const ITEM_COUNT: &str = "cart-items-count";
const PROMO_INPUT: &str = "promo-code";
const PROMO_BUTTON: &str = "apply-promo";
const CLEAR_BUTTON: &str = "clear-all-btn";

fn row_id(product_id: ProductId) -> String {
    format!("cart-item-{product_id}")
}

fn input_id(product_id: ProductId) -> String {
    format!("quantity-input-{product_id}")
}

fn row_total_id(product_id: ProductId) -> String {
    format!("cart-item-total-{product_id}")
}

fn remove_button_id(product_id: ProductId) -> String {
    format!("remove-btn-{product_id}")
}

/// One rendered cart line, tracked only for quantity rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Controller for the cart page.
pub struct CartPage {
    api: ShopApi,
    lines: Vec<CartLine>,
}

impl CartPage {
    /// Build from the lines the page rendered with.
    #[must_use]
    pub fn new(api: ShopApi, lines: Vec<CartLine>) -> Self {
        Self { api, lines }
    }

    /// The lines as currently known.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    // =========================================================================
    // Quantity
    // =========================================================================

    /// The `+` stepper.
    pub async fn increase(&mut self, product_id: ProductId) -> UiUpdate {
        let Some(line) = self.line(product_id) else {
            return UiUpdate::new();
        };
        let quantity = line.quantity + 1;
        self.update_quantity(product_id, quantity).await
    }

    /// The `-` stepper; the floor is one.
    pub async fn decrease(&mut self, product_id: ProductId) -> UiUpdate {
        let Some(line) = self.line(product_id) else {
            return UiUpdate::new();
        };
        let quantity = (line.quantity - 1).max(1);
        self.update_quantity(product_id, quantity).await
    }

    /// A value typed straight into the input; empty or junk becomes one.
    pub async fn input_changed(&mut self, product_id: ProductId, value: &str) -> UiUpdate {
        let quantity = value.trim().parse::<i64>().unwrap_or(1).max(1);
        self.update_quantity(product_id, quantity).await
    }

    /// POST the new quantity; patch the row subtotal and aggregates on
    /// success, roll the input back on failure.
    pub async fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> UiUpdate {
        let Some(index) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return UiUpdate::new();
        };
        let original = self
            .lines
            .get(index)
            .map_or(1, |l| l.quantity);

        let mut update = UiUpdate::new();
        update.push(DomPatch::AddClass {
            target: row_id(product_id),
            class: "loading".to_string(),
        });

        match self.api.update_cart(product_id, quantity).await {
            Ok(totals) => {
                if let Some(line) = self.lines.get_mut(index) {
                    line.quantity = quantity;
                }
                update.set_value(input_id(product_id), quantity.to_string());
                if let Some(item_subtotal) = totals.item_subtotal {
                    update.set_text(row_total_id(product_id), item_subtotal.display_short());
                }
                apply_totals(&mut update, &totals);
                update.toast(Toast::success("Đã cập nhật số lượng!"));
            }
            Err(e) => {
                warn!(error = %e, product_id = %product_id, "cart quantity update failed");
                update.set_value(input_id(product_id), original.to_string());
                update.toast(Toast::error(e.user_message()));
            }
        }

        update.push(DomPatch::RemoveClass {
            target: row_id(product_id),
            class: "loading".to_string(),
        });
        update
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove a line after the native confirm; plays the removal
    /// transition, then reloads the page when the cart empties.
    pub async fn remove(
        &mut self,
        product_id: ProductId,
        confirm: impl FnOnce(&str) -> bool,
    ) -> UiUpdate {
        if !confirm("Bạn có chắc muốn xóa sản phẩm này khỏi giỏ hàng?") {
            return UiUpdate::new();
        }

        let mut update = UiUpdate::new();
        update.set_disabled(remove_button_id(product_id), true);

        match self.api.remove_from_cart(product_id).await {
            Ok(totals) => {
                self.lines.retain(|l| l.product_id != product_id);
                update.push(DomPatch::AddClass {
                    target: row_id(product_id),
                    class: "cart-item-removing".to_string(),
                });
                update.push(DomPatch::Remove {
                    target: row_id(product_id),
                });
                apply_totals(&mut update, &totals);
                update.toast(Toast::success("Đã xóa sản phẩm khỏi giỏ hàng!"));
                if self.lines.is_empty() {
                    update.push(DomPatch::ReloadPage);
                }
            }
            Err(e) => {
                warn!(error = %e, product_id = %product_id, "cart removal failed");
                update.toast(Toast::error(e.user_message()));
                update.set_disabled(remove_button_id(product_id), false);
            }
        }
        update
    }

    /// Empty the whole cart after the native confirm.
    pub async fn clear(&mut self, confirm: impl FnOnce(&str) -> bool) -> UiUpdate {
        if !confirm("Bạn có chắc muốn xóa tất cả sản phẩm khỏi giỏ hàng?") {
            return UiUpdate::new();
        }

        let mut update = UiUpdate::new();
        update.set_disabled(CLEAR_BUTTON, true);
        update.set_text(CLEAR_BUTTON, "Đang xóa...");

        match self.api.clear_cart().await {
            Ok(_) => {
                self.lines.clear();
                update.toast(Toast::success("Đã xóa tất cả sản phẩm!"));
                update.push(DomPatch::ReloadPage);
            }
            Err(e) => {
                warn!(error = %e, "cart clear failed");
                update.toast(Toast::error(e.user_message()));
            }
        }

        update.set_text(CLEAR_BUTTON, "Xóa tất cả");
        update.set_disabled(CLEAR_BUTTON, false);
        update
    }

    // =========================================================================
    // Promo code
    // =========================================================================

    /// Apply the promo input; invalid codes leave the display untouched.
    pub async fn apply_promo(&self, code: &str) -> UiUpdate {
        let code = code.trim();
        let mut update = UiUpdate::new();

        if code.is_empty() {
            update.toast(Toast::warning("Vui lòng nhập mã giảm giá!"));
            return update;
        }

        update.set_disabled(PROMO_BUTTON, true);

        match self.api.apply_promo(code).await {
            Ok(totals) => {
                apply_totals(&mut update, &totals);
                if let Some(discount) = totals.discount {
                    update.set_text(DISCOUNT, format!("-{}", discount.display()));
                }
                update.toast(Toast::success("Đã áp dụng mã giảm giá!"));
                update.set_value(PROMO_INPUT, "");
            }
            Err(e) => {
                warn!(error = %e, "promo application failed");
                update.toast(Toast::error(e.user_message()));
            }
        }

        update.set_disabled(PROMO_BUTTON, false);
        update
    }
}

/// Patch whichever aggregates the server recomputed.
fn apply_totals(update: &mut UiUpdate, totals: &CartTotals) {
    if let Some(subtotal) = totals.subtotal {
        update.set_text(SUBTOTAL, subtotal.display());
    }
    if let Some(total) = totals.total {
        update.set_text(TOTAL_AMOUNT, total.display());
    }
    if let Some(count) = totals.cart_count {
        if count > 0 {
            update.set_text(CART_BADGE, count.to_string());
            update.show(CART_BADGE);
        } else {
            update.hide(CART_BADGE);
        }
    }
    if let Some(item_count) = totals.item_count {
        update.set_text(ITEM_COUNT, format!("{item_count} sản phẩm trong giỏ"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pawmart_core::Price;

    use crate::config::StorefrontConfig;

    fn offline_api() -> ShopApi {
        let config = StorefrontConfig::for_base_url("http://127.0.0.1:9/".parse().expect("url"));
        ShopApi::new(&config)
    }

    fn page(lines: &[(i64, i64)]) -> CartPage {
        CartPage::new(
            offline_api(),
            lines
                .iter()
                .map(|&(id, quantity)| CartLine {
                    product_id: ProductId::new(id),
                    quantity,
                })
                .collect(),
        )
    }

    #[test]
    fn test_apply_totals_patches_only_present_fields() {
        let mut update = UiUpdate::new();
        apply_totals(
            &mut update,
            &CartTotals {
                subtotal: Some(Price::from_vnd(500_000)),
                ..CartTotals::default()
            },
        );
        assert_eq!(update.patches.len(), 1);
        assert!(matches!(
            update.patches.first(),
            Some(DomPatch::SetText { target, text })
                if target == SUBTOTAL && text == "500.000₫"
        ));
    }

    #[test]
    fn test_cart_badge_hides_at_zero() {
        let mut update = UiUpdate::new();
        apply_totals(
            &mut update,
            &CartTotals {
                cart_count: Some(0),
                ..CartTotals::default()
            },
        );
        assert!(update
            .patches
            .iter()
            .any(|p| matches!(p, DomPatch::Hide { target } if target == CART_BADGE)));
    }

    #[tokio::test]
    async fn test_promo_requires_a_code() {
        let page = page(&[(1, 2)]);
        let update = page.apply_promo("   ").await;
        assert_eq!(update.toasts.len(), 1);
        assert_eq!(
            update.toasts.first().map(|t| t.message.as_str()),
            Some("Vui lòng nhập mã giảm giá!")
        );
        // No request was attempted, so no disable/enable cycle either.
        assert!(update.patches.is_empty());
    }

    #[tokio::test]
    async fn test_remove_declined_confirm_is_a_no_op() {
        let mut page = page(&[(1, 2)]);
        let update = page.remove(ProductId::new(1), |_| false).await;
        assert_eq!(update, UiUpdate::new());
        assert_eq!(page.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_rolls_the_input_back() {
        // Port 9 is closed; the POST fails at the transport layer.
        let mut page = page(&[(1, 2)]);
        let update = page.update_quantity(ProductId::new(1), 5).await;

        // The row is un-marked, the input restored, the error toasted.
        assert!(update.patches.iter().any(|p| matches!(
            p,
            DomPatch::SetValue { target, value }
                if target == "quantity-input-1" && value == "2"
        )));
        assert!(update.patches.iter().any(|p| matches!(
            p,
            DomPatch::RemoveClass { target, class }
                if target == "cart-item-1" && class == "loading"
        )));
        assert_eq!(
            update.toasts.first().map(|t| t.message.as_str()),
            Some("Lỗi mạng xảy ra")
        );
        // The tracked quantity is unchanged.
        assert_eq!(page.lines().first().map(|l| l.quantity), Some(2));
    }

    #[tokio::test]
    async fn test_unknown_product_is_ignored() {
        let mut page = page(&[(1, 2)]);
        let update = page.update_quantity(ProductId::new(99), 3).await;
        assert_eq!(update, UiUpdate::new());
    }
}
