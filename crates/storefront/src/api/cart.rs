//! Cart endpoints.
//!
//! The server is the source of truth for totals; every mutation answers
//! with whichever aggregates it recomputed. Absent fields mean "unchanged"
//! and are left alone on the page.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use pawmart_core::{Price, ProductId};

use super::{ApiError, ShopApi};

/// Aggregates a cart mutation sends back. Every field is optional; only
/// the ones present get patched into the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartTotals {
    #[serde(default)]
    pub cart_count: Option<i64>,
    #[serde(default)]
    pub subtotal: Option<Price>,
    #[serde(default)]
    pub total: Option<Price>,
    #[serde(default)]
    pub item_count: Option<i64>,
    #[serde(default)]
    pub item_subtotal: Option<Price>,
    #[serde(default)]
    pub discount: Option<Price>,
}

#[derive(Debug, Serialize)]
struct CartLineBody {
    product_id: ProductId,
    quantity: i64,
}

#[derive(Debug, Serialize)]
struct ProductBody {
    product_id: ProductId,
}

#[derive(Debug, Serialize)]
struct PromoBody<'a> {
    promo_code: &'a str,
}

impl ShopApi {
    /// Put a product in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartTotals, ApiError> {
        self.post_envelope(
            "/add-to-cart",
            &CartLineBody {
                product_id,
                quantity,
            },
        )
        .await
    }

    /// Change a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn update_cart(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartTotals, ApiError> {
        self.post_envelope(
            "/update-cart",
            &CartLineBody {
                product_id,
                quantity,
            },
        )
        .await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_cart(&self, product_id: ProductId) -> Result<CartTotals, ApiError> {
        self.post_envelope("/remove-from-cart", &ProductBody { product_id })
            .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<CartTotals, ApiError> {
        self.post_envelope("/clear-cart", &serde_json::json!({})).await
    }

    /// Apply a promo code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports
    /// failure (an invalid code comes back as a failure envelope).
    #[instrument(skip(self))]
    pub async fn apply_promo(&self, code: &str) -> Result<CartTotals, ApiError> {
        self.post_envelope("/apply-promo", &PromoBody { promo_code: code })
            .await
    }
}
