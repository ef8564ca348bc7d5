//! Product endpoints.
//!
//! Listing rides the public `/api/products` feed; mutations go through the
//! admin form routes. Saving is multipart (the editor form uploads an image
//! alongside the fields) and answers 2xx-or-raw-text rather than the JSON
//! envelope.

use reqwest::multipart;
use serde::Deserialize;
use tracing::instrument;

use pawmart_core::{CategoryId, Price, ProductId};

use super::{AdminApi, ApiError};

/// A product as the server lists it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    /// Category name; the server calls this field `type`.
    #[serde(rename = "type")]
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub price: Price,
    pub quantity: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductListPayload {
    products: Vec<ProductRecord>,
}

/// Fields posted by the product editor.
#[derive(Debug, Clone)]
pub struct ProductPayload {
    pub name: String,
    pub category_id: CategoryId,
    pub brand: String,
    pub price: Price,
    pub quantity: i64,
    pub description: String,
    pub cost: Price,
    pub import_price: Price,
    /// Image URL field, sent only when filled in.
    pub image_url: Option<String>,
    /// Image file part, sent only when one was picked.
    pub image: Option<ImageUpload>,
}

/// An image file picked in the editor.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl AdminApi {
    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductRecord>, ApiError> {
        let payload: ProductListPayload = self.get_envelope("/api/products").await?;
        Ok(payload.products)
    }

    /// Create or update a product via the multipart form routes.
    ///
    /// The same form posts to `/admin/products/add` or
    /// `/admin/products/edit/{id}`; which one is chosen only by the presence
    /// of an edit id. Success is any 2xx; an error response carries a raw
    /// text body, surfaced verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with the response text on non-2xx.
    #[instrument(skip(self, payload), fields(edit_id = ?edit_id))]
    pub async fn save_product(
        &self,
        edit_id: Option<ProductId>,
        payload: &ProductPayload,
    ) -> Result<(), ApiError> {
        let path = edit_id.map_or_else(
            || "/admin/products/add".to_string(),
            |id| format!("/admin/products/edit/{id}"),
        );

        let mut form = multipart::Form::new()
            .text("tenSanPham", payload.name.clone())
            .text("maLoai", payload.category_id.to_string())
            .text("thuongHieu", payload.brand.clone())
            .text("giaBan", payload.price.amount().to_string())
            .text("soLuong", payload.quantity.to_string())
            .text("moTa", payload.description.clone())
            .text("chiPhi", payload.cost.amount().to_string())
            .text("giaNhap", payload.import_price.amount().to_string());

        if let Some(url) = &payload.image_url {
            form = form.text("hinhAnhUrl", url.clone());
        }
        if let Some(image) = &payload.image {
            let part =
                multipart::Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
            form = form.part("hinhAnh", part);
        }

        let response = self
            .http()
            .post(self.url(&path))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.post_ack(&format!("/admin/products/delete/{id}")).await
    }
}
