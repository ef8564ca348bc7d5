//! Storefront catalog page.
//!
//! The cards are already rendered; filtering just shows and hides them by
//! three independent facets read from their data attributes (pet type,
//! brand, price bracket). Add-to-cart buttons walk an explicit
//! `idle -> loading -> success | error -> idle` cycle, driven by the fetch
//! outcome and a reset timeout.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::{Duration, Instant};

use tracing::warn;

use pawmart_core::ui::{Toast, UiUpdate};
use pawmart_core::{Price, ProductId};

use crate::api::ShopApi;

const CART_BADGE: &str = "cart-badge";
const BUTTON_RESET_DELAY: Duration = Duration::from_millis(1500);

fn card_id(product_id: ProductId) -> String {
    format!("product-item-{product_id}")
}

fn button_id(product_id: ProductId) -> String {
    format!("add-to-cart-{product_id}")
}

/// A price facet parsed from the dropdown's `min-max` value; an open upper
/// bound (`500000-`) matches everything above the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBracket {
    pub min: i64,
    pub max: Option<i64>,
}

impl PriceBracket {
    /// Both bounds are inclusive, as the dropdown labels read.
    fn matches(self, price: Price) -> bool {
        Price::from_vnd(self.min) <= price
            && self.max.is_none_or(|max| price <= Price::from_vnd(max))
    }
}

impl FromStr for PriceBracket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid price bracket: {s}"))?;
        let min = min
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid price bracket {s}: {e}"))?;
        let max = max.trim();
        let max = if max.is_empty() {
            None
        } else {
            Some(
                max.parse::<i64>()
                    .map_err(|e| format!("invalid price bracket {s}: {e}"))?,
            )
        };
        Ok(Self { min, max })
    }
}

/// One rendered product card, seeded from its data attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub product_id: ProductId,
    pub pet_type: String,
    pub brand: String,
    pub price: Price,
}

/// The three independent facets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilters {
    pub pet_type: Option<String>,
    pub brand: Option<String>,
    pub price: Option<PriceBracket>,
}

impl CatalogFilters {
    /// Whether a card stays visible.
    #[must_use]
    pub fn matches(&self, card: &ProductCard) -> bool {
        let matches_type = self
            .pet_type
            .as_ref()
            .is_none_or(|pet_type| &card.pet_type == pet_type);
        let matches_brand = self
            .brand
            .as_ref()
            .is_none_or(|brand| &card.brand == brand);
        let matches_price = self.price.is_none_or(|bracket| bracket.matches(card.price));
        matches_type && matches_brand && matches_price
    }
}

/// Add-to-cart button phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Default)]
struct AddToCartButton {
    phase: ButtonPhase,
    reset_at: Option<Instant>,
}

/// Controller for the catalog page.
pub struct CatalogPage {
    api: ShopApi,
    cards: Vec<ProductCard>,
    filters: CatalogFilters,
    buttons: HashMap<ProductId, AddToCartButton>,
}

impl CatalogPage {
    /// Build from the rendered cards.
    #[must_use]
    pub fn new(api: ShopApi, cards: Vec<ProductCard>) -> Self {
        Self {
            api,
            cards,
            filters: CatalogFilters::default(),
            buttons: HashMap::new(),
        }
    }

    /// The phase a product's button is in.
    #[must_use]
    pub fn button_phase(&self, product_id: ProductId) -> ButtonPhase {
        self.buttons
            .get(&product_id)
            .map_or(ButtonPhase::Idle, |b| b.phase)
    }

    // =========================================================================
    // Facet filtering
    // =========================================================================

    pub fn set_pet_type(&mut self, pet_type: Option<String>) -> UiUpdate {
        self.filters.pet_type = pet_type.filter(|s| !s.is_empty());
        self.apply_filters()
    }

    pub fn set_brand(&mut self, brand: Option<String>) -> UiUpdate {
        self.filters.brand = brand.filter(|s| !s.is_empty());
        self.apply_filters()
    }

    /// The price dropdown; an unparseable value clears the facet.
    pub fn set_price_bracket(&mut self, raw: &str) -> UiUpdate {
        self.filters.price = raw.parse().ok();
        self.apply_filters()
    }

    /// Show the matching cards, hide the rest.
    fn apply_filters(&self) -> UiUpdate {
        let mut update = UiUpdate::new();
        for card in &self.cards {
            if self.filters.matches(card) {
                update.show(card_id(card.product_id));
            } else {
                update.hide(card_id(card.product_id));
            }
        }
        update
    }

    /// The cards currently visible.
    #[must_use]
    pub fn visible_cards(&self) -> Vec<&ProductCard> {
        self.cards
            .iter()
            .filter(|c| self.filters.matches(c))
            .collect()
    }

    // =========================================================================
    // Add to cart
    // =========================================================================

    /// Disable the button and show the loading label; a button already in
    /// flight (or cooling down) ignores further clicks.
    pub fn begin_add_to_cart(&mut self, product_id: ProductId, _now: Instant) -> UiUpdate {
        let button = self.buttons.entry(product_id).or_default();
        let mut update = UiUpdate::new();
        if button.phase != ButtonPhase::Idle {
            return update;
        }
        button.phase = ButtonPhase::Loading;
        update.set_disabled(button_id(product_id), true);
        update.set_text(button_id(product_id), "Đang thêm...");
        update
    }

    /// POST the add and settle the button into success or error; either
    /// way it resets to idle after the timeout via [`Self::tick`].
    pub async fn finish_add_to_cart(&mut self, product_id: ProductId, now: Instant) -> UiUpdate {
        let mut update = UiUpdate::new();
        if self.button_phase(product_id) != ButtonPhase::Loading {
            return update;
        }

        let outcome = self.api.add_to_cart(product_id, 1).await;
        let button = self.buttons.entry(product_id).or_default();
        button.reset_at = Some(now + BUTTON_RESET_DELAY);

        match outcome {
            Ok(totals) => {
                button.phase = ButtonPhase::Success;
                update.set_text(button_id(product_id), "Đã thêm!");
                if let Some(count) = totals.cart_count {
                    if count > 0 {
                        update.set_text(CART_BADGE, count.to_string());
                        update.show(CART_BADGE);
                    } else {
                        update.hide(CART_BADGE);
                    }
                }
                update.toast(Toast::success("Đã thêm sản phẩm vào giỏ hàng!"));
            }
            Err(e) => {
                warn!(error = %e, product_id = %product_id, "add to cart failed");
                button.phase = ButtonPhase::Error;
                update.set_text(button_id(product_id), "Lỗi");
                update.toast(Toast::error(e.user_message()));
            }
        }
        update
    }

    /// Reset any buttons whose cooldown elapsed.
    pub fn tick(&mut self, now: Instant) -> UiUpdate {
        let mut update = UiUpdate::new();
        for (product_id, button) in &mut self.buttons {
            if button.phase == ButtonPhase::Loading {
                continue;
            }
            if button.reset_at.is_some_and(|at| now >= at) {
                button.phase = ButtonPhase::Idle;
                button.reset_at = None;
                update.set_text(button_id(*product_id), "Thêm vào giỏ");
                update.set_disabled(button_id(*product_id), false);
            }
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pawmart_core::ui::DomPatch;

    use crate::config::StorefrontConfig;

    fn offline_api() -> ShopApi {
        let config = StorefrontConfig::for_base_url("http://127.0.0.1:9/".parse().expect("url"));
        ShopApi::new(&config)
    }

    fn card(id: i64, pet_type: &str, brand: &str, price: i64) -> ProductCard {
        ProductCard {
            product_id: ProductId::new(id),
            pet_type: pet_type.to_string(),
            brand: brand.to_string(),
            price: Price::from_vnd(price),
        }
    }

    fn page() -> CatalogPage {
        CatalogPage::new(
            offline_api(),
            vec![
                card(1, "dog", "Royal Canin", 185_000),
                card(2, "cat", "Whiskas", 25_000),
                card(3, "cat", "Me-O", 320_000),
                card(4, "dog", "Pedigree", 95_000),
            ],
        )
    }

    #[test]
    fn test_price_bracket_parsing() {
        let closed: PriceBracket = "0-200000".parse().expect("closed");
        assert_eq!(closed.min, 0);
        assert_eq!(closed.max, Some(200_000));

        let open: PriceBracket = "500000-".parse().expect("open");
        assert_eq!(open.min, 500_000);
        assert_eq!(open.max, None);

        assert!("gibberish".parse::<PriceBracket>().is_err());
    }

    #[test]
    fn test_price_bracket_bounds_are_inclusive() {
        let mut page = page();
        page.set_price_bracket("95000-185000");
        let visible: Vec<i64> = page
            .visible_cards()
            .iter()
            .map(|c| c.product_id.as_i64())
            .collect();
        assert_eq!(visible, vec![1, 4]);

        page.set_price_bracket("300000-");
        assert_eq!(page.visible_cards().len(), 1);
    }

    #[test]
    fn test_facets_apply_independently_and_together() {
        let mut page = page();

        page.set_pet_type(Some("cat".to_string()));
        assert_eq!(page.visible_cards().len(), 2);

        page.set_brand(Some("Whiskas".to_string()));
        assert_eq!(page.visible_cards().len(), 1);

        // Clearing one facet leaves the other applied.
        page.set_brand(Some(String::new()));
        assert_eq!(page.visible_cards().len(), 2);
    }

    #[test]
    fn test_filtering_emits_show_and_hide_patches() {
        let mut page = page();
        let update = page.set_pet_type(Some("dog".to_string()));

        assert!(update
            .patches
            .iter()
            .any(|p| matches!(p, DomPatch::Show { target } if target == "product-item-1")));
        assert!(update
            .patches
            .iter()
            .any(|p| matches!(p, DomPatch::Hide { target } if target == "product-item-2")));
    }

    #[test]
    fn test_begin_add_disables_and_guards_reentry() {
        let now = Instant::now();
        let mut page = page();
        let id = ProductId::new(1);

        let first = page.begin_add_to_cart(id, now);
        assert_eq!(page.button_phase(id), ButtonPhase::Loading);
        assert!(first.patches.iter().any(|p| matches!(
            p,
            DomPatch::SetDisabled { target, disabled: true } if target == "add-to-cart-1"
        )));

        // A double-click while in flight does nothing.
        let second = page.begin_add_to_cart(id, now);
        assert!(second.patches.is_empty());
    }

    #[tokio::test]
    async fn test_failed_add_settles_into_error_then_resets() {
        // Port 9 is closed; the POST fails at the transport layer.
        let now = Instant::now();
        let mut page = page();
        let id = ProductId::new(2);

        page.begin_add_to_cart(id, now);
        let update = page.finish_add_to_cart(id, now).await;
        assert_eq!(page.button_phase(id), ButtonPhase::Error);
        assert_eq!(
            update.toasts.first().map(|t| t.message.as_str()),
            Some("Lỗi mạng xảy ra")
        );

        // Before the cooldown nothing resets; after it the button returns
        // to idle and is re-enabled.
        assert!(page.tick(now + Duration::from_millis(100)).patches.is_empty());
        let reset = page.tick(now + Duration::from_millis(1500));
        assert_eq!(page.button_phase(id), ButtonPhase::Idle);
        assert!(reset.patches.iter().any(|p| matches!(
            p,
            DomPatch::SetDisabled { target, disabled: false } if target == "add-to-cart-2"
        )));
    }

    #[tokio::test]
    async fn test_finish_without_begin_is_a_no_op() {
        let mut page = page();
        let update = page
            .finish_add_to_cart(ProductId::new(1), Instant::now())
            .await;
        assert!(update.patches.is_empty());
        assert!(update.toasts.is_empty());
    }
}
