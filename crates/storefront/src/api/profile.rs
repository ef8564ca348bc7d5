//! Profile, address, and password endpoints.
//!
//! Field names follow the server's form vocabulary; the envelope carries
//! no payload beyond success and message.

use serde::Serialize;
use tracing::instrument;

use pawmart_core::AddressId;

use super::{ApiError, ShopApi};

/// The edit-profile dialog's fields, as posted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePayload {
    /// Family name.
    pub ho: String,
    /// Given name.
    pub ten: String,
    pub so_dien_thoai: String,
    pub ngay_sinh: Option<String>,
    pub gioi_tinh: Option<String>,
    pub dia_chi: String,
}

/// The address dialog's fields, as posted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddressPayload {
    pub ten_nguoi_nhan: String,
    pub so_dien_thoai: String,
    pub dia_chi: String,
    pub quan_huyen: String,
    pub tinh_thanh: String,
    pub mac_dinh: bool,
}

#[derive(Debug, Serialize)]
struct AddressUpdateBody<'a> {
    address_id: AddressId,
    #[serde(flatten)]
    address: &'a AddressPayload,
}

#[derive(Debug, Serialize)]
struct AddressIdBody {
    address_id: AddressId,
}

#[derive(Debug, Serialize)]
struct PasswordBody<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

impl ShopApi {
    /// Save the profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, payload: &ProfilePayload) -> Result<(), ApiError> {
        self.post_envelope::<_, serde_json::Value>("/update-profile", payload)
            .await?;
        Ok(())
    }

    /// Create a delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip_all)]
    pub async fn add_address(&self, payload: &AddressPayload) -> Result<(), ApiError> {
        self.post_envelope::<_, serde_json::Value>("/add-address", payload)
            .await?;
        Ok(())
    }

    /// Update a delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip_all, fields(address_id = %address_id))]
    pub async fn update_address(
        &self,
        address_id: AddressId,
        payload: &AddressPayload,
    ) -> Result<(), ApiError> {
        self.post_envelope::<_, serde_json::Value>(
            "/update-address",
            &AddressUpdateBody {
                address_id,
                address: payload,
            },
        )
        .await?;
        Ok(())
    }

    /// Delete a delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn delete_address(&self, address_id: AddressId) -> Result<(), ApiError> {
        self.post_envelope::<_, serde_json::Value>(
            "/delete-address",
            &AddressIdBody { address_id },
        )
        .await?;
        Ok(())
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        self.post_envelope::<_, serde_json::Value>(
            "/change-password",
            &PasswordBody {
                current_password,
                new_password,
            },
        )
        .await?;
        Ok(())
    }
}
