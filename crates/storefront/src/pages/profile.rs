//! Profile page.
//!
//! A sequence of modal dialogs (edit profile, add/edit/delete address,
//! change password), each validating its fields in the pre-confirmation
//! hook. A validation failure re-displays the dialog with an inline
//! message and never reaches the network; a confirmed dialog posts to its
//! endpoint and reloads the page.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use pawmart_core::ui::{DomPatch, Toast, UiUpdate};
use pawmart_core::AddressId;

use crate::api::profile::{AddressPayload, ProfilePayload};
use crate::api::ShopApi;

// Element ids the profile page carries.
const PROFILE_MODAL: &str = "edit-profile-modal";
const PROFILE_ERROR: &str = "edit-profile-error";
const ADDRESS_MODAL: &str = "address-modal";
const ADDRESS_ERROR: &str = "address-error";
const PASSWORD_MODAL: &str = "change-password-modal";
const PASSWORD_ERROR: &str = "change-password-error";

/// Phones are digits only, at least this long.
const PHONE_MIN_LEN: usize = 10;
const PASSWORD_MIN_LEN: usize = 6;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("phone pattern compiles"));

fn validate_phone(phone: &str) -> Result<(), String> {
    if !PHONE_RE.is_match(phone) {
        return Err("Số điện thoại chỉ được chứa chữ số!".to_string());
    }
    if phone.len() < PHONE_MIN_LEN {
        return Err(format!(
            "Số điện thoại phải có ít nhất {PHONE_MIN_LEN} chữ số!"
        ));
    }
    Ok(())
}

/// The edit-profile dialog's fields.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub ho: String,
    pub ten: String,
    pub so_dien_thoai: String,
    pub ngay_sinh: Option<String>,
    pub gioi_tinh: Option<String>,
    pub dia_chi: String,
}

impl ProfileForm {
    /// The dialog's pre-confirmation hook.
    ///
    /// # Errors
    ///
    /// Returns the inline message when a required field is missing or the
    /// phone fails the pattern.
    pub fn validate(&self) -> Result<(), String> {
        if self.ho.trim().is_empty() || self.ten.trim().is_empty() {
            return Err("Vui lòng nhập họ và tên!".to_string());
        }
        let phone = self.so_dien_thoai.trim();
        if !phone.is_empty() {
            validate_phone(phone)?;
        }
        Ok(())
    }

    fn into_payload(self) -> ProfilePayload {
        ProfilePayload {
            ho: self.ho.trim().to_string(),
            ten: self.ten.trim().to_string(),
            so_dien_thoai: self.so_dien_thoai.trim().to_string(),
            ngay_sinh: self.ngay_sinh,
            gioi_tinh: self.gioi_tinh,
            dia_chi: self.dia_chi.trim().to_string(),
        }
    }
}

/// The address dialog's fields (shared by add and edit).
#[derive(Debug, Clone, Default)]
pub struct AddressForm {
    pub ten_nguoi_nhan: String,
    pub so_dien_thoai: String,
    pub dia_chi: String,
    pub quan_huyen: String,
    pub tinh_thanh: String,
    pub mac_dinh: bool,
}

impl AddressForm {
    /// The dialog's pre-confirmation hook.
    ///
    /// # Errors
    ///
    /// Returns the inline message when a required field is missing or the
    /// phone fails the pattern.
    pub fn validate(&self) -> Result<(), String> {
        if self.ten_nguoi_nhan.trim().is_empty()
            || self.dia_chi.trim().is_empty()
            || self.quan_huyen.trim().is_empty()
            || self.tinh_thanh.trim().is_empty()
        {
            return Err("Vui lòng điền đầy đủ thông tin địa chỉ!".to_string());
        }
        validate_phone(self.so_dien_thoai.trim())
    }

    fn into_payload(self) -> AddressPayload {
        AddressPayload {
            ten_nguoi_nhan: self.ten_nguoi_nhan.trim().to_string(),
            so_dien_thoai: self.so_dien_thoai.trim().to_string(),
            dia_chi: self.dia_chi.trim().to_string(),
            quan_huyen: self.quan_huyen.trim().to_string(),
            tinh_thanh: self.tinh_thanh.trim().to_string(),
            mac_dinh: self.mac_dinh,
        }
    }
}

/// The change-password dialog's fields.
#[derive(Debug, Clone, Default)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordForm {
    /// The dialog's pre-confirmation hook.
    ///
    /// # Errors
    ///
    /// Returns the inline message when the current password is missing,
    /// the new one is too short, or the confirmation does not match.
    pub fn validate(&self) -> Result<(), String> {
        if self.current_password.is_empty() {
            return Err("Vui lòng nhập mật khẩu hiện tại!".to_string());
        }
        if self.new_password.len() < PASSWORD_MIN_LEN {
            return Err(format!(
                "Mật khẩu mới phải có ít nhất {PASSWORD_MIN_LEN} ký tự!"
            ));
        }
        if self.new_password != self.confirm_password {
            return Err("Mật khẩu xác nhận không khớp!".to_string());
        }
        Ok(())
    }
}

/// Which dialog is open, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenDialog {
    EditProfile,
    AddAddress,
    EditAddress(AddressId),
    ChangePassword,
}

/// Controller for the profile page.
pub struct ProfilePage {
    api: ShopApi,
    dialog: Option<OpenDialog>,
}

impl ProfilePage {
    #[must_use]
    pub fn new(api: ShopApi) -> Self {
        Self { api, dialog: None }
    }

    /// The dialog currently open.
    #[must_use]
    pub const fn open_dialog(&self) -> Option<OpenDialog> {
        self.dialog
    }

    // =========================================================================
    // Opening and closing
    // =========================================================================

    pub fn open_edit_profile(&mut self) -> UiUpdate {
        self.open(OpenDialog::EditProfile, PROFILE_MODAL, PROFILE_ERROR)
    }

    pub fn open_add_address(&mut self) -> UiUpdate {
        self.open(OpenDialog::AddAddress, ADDRESS_MODAL, ADDRESS_ERROR)
    }

    pub fn open_edit_address(&mut self, address_id: AddressId) -> UiUpdate {
        self.open(
            OpenDialog::EditAddress(address_id),
            ADDRESS_MODAL,
            ADDRESS_ERROR,
        )
    }

    pub fn open_change_password(&mut self) -> UiUpdate {
        self.open(OpenDialog::ChangePassword, PASSWORD_MODAL, PASSWORD_ERROR)
    }

    fn open(&mut self, dialog: OpenDialog, modal: &str, error_slot: &str) -> UiUpdate {
        self.dialog = Some(dialog);
        let mut update = UiUpdate::new();
        update.set_text(error_slot, "");
        update.hide(error_slot);
        update.open_modal(modal);
        update
    }

    /// Close whichever dialog is open.
    pub fn close_dialog(&mut self) -> UiUpdate {
        let mut update = UiUpdate::new();
        if let Some(dialog) = self.dialog.take() {
            let modal = match dialog {
                OpenDialog::EditProfile => PROFILE_MODAL,
                OpenDialog::AddAddress | OpenDialog::EditAddress(_) => ADDRESS_MODAL,
                OpenDialog::ChangePassword => PASSWORD_MODAL,
            };
            update.close_modal(modal);
        }
        update
    }

    // =========================================================================
    // Confirmation hooks
    // =========================================================================

    /// Confirm the edit-profile dialog with its current fields.
    pub async fn submit_profile(&mut self, form: ProfileForm) -> UiUpdate {
        if let Err(message) = form.validate() {
            return inline_error(PROFILE_ERROR, &message);
        }

        let mut update = UiUpdate::new();
        match self.api.update_profile(&form.into_payload()).await {
            Ok(()) => {
                update.merge(self.close_dialog());
                update.toast(Toast::success("Cập nhật thông tin thành công!"));
                update.push(DomPatch::ReloadPage);
            }
            Err(e) => {
                warn!(error = %e, "profile update failed");
                update.merge(inline_error(PROFILE_ERROR, &e.user_message()));
            }
        }
        update
    }

    /// Confirm the address dialog; add or edit is decided by how it was
    /// opened.
    pub async fn submit_address(&mut self, form: AddressForm) -> UiUpdate {
        if let Err(message) = form.validate() {
            return inline_error(ADDRESS_ERROR, &message);
        }

        let payload = form.into_payload();
        let result = match self.dialog {
            Some(OpenDialog::EditAddress(address_id)) => {
                self.api.update_address(address_id, &payload).await
            }
            _ => self.api.add_address(&payload).await,
        };

        let mut update = UiUpdate::new();
        match result {
            Ok(()) => {
                update.merge(self.close_dialog());
                update.toast(Toast::success("Đã lưu địa chỉ!"));
                update.push(DomPatch::ReloadPage);
            }
            Err(e) => {
                warn!(error = %e, "address save failed");
                update.merge(inline_error(ADDRESS_ERROR, &e.user_message()));
            }
        }
        update
    }

    /// Delete an address after the native confirm.
    pub async fn delete_address(
        &self,
        address_id: AddressId,
        confirm: impl FnOnce(&str) -> bool,
    ) -> UiUpdate {
        if !confirm("Bạn có chắc chắn muốn xóa địa chỉ này?") {
            return UiUpdate::new();
        }

        let mut update = UiUpdate::new();
        match self.api.delete_address(address_id).await {
            Ok(()) => {
                update.toast(Toast::success("Đã xóa địa chỉ!"));
                update.push(DomPatch::ReloadPage);
            }
            Err(e) => {
                warn!(error = %e, address_id = %address_id, "address delete failed");
                update.toast(Toast::error(e.user_message()));
            }
        }
        update
    }

    /// Confirm the change-password dialog with its current fields.
    pub async fn submit_password(&mut self, form: PasswordForm) -> UiUpdate {
        if let Err(message) = form.validate() {
            return inline_error(PASSWORD_ERROR, &message);
        }

        let mut update = UiUpdate::new();
        match self
            .api
            .change_password(&form.current_password, &form.new_password)
            .await
        {
            Ok(()) => {
                update.merge(self.close_dialog());
                update.toast(Toast::success("Đổi mật khẩu thành công!"));
            }
            Err(e) => {
                warn!(error = %e, "password change failed");
                update.merge(inline_error(PASSWORD_ERROR, &e.user_message()));
            }
        }
        update
    }
}

/// The dialog stays open; the message lands in its inline error slot.
fn inline_error(slot: &str, message: &str) -> UiUpdate {
    let mut update = UiUpdate::new();
    update.set_text(slot, message);
    update.show(slot);
    update
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::StorefrontConfig;

    fn offline_api() -> ShopApi {
        let config = StorefrontConfig::for_base_url("http://127.0.0.1:9/".parse().expect("url"));
        ShopApi::new(&config)
    }

    fn valid_address() -> AddressForm {
        AddressForm {
            ten_nguoi_nhan: "Nguyen Van A".to_string(),
            so_dien_thoai: "0912345678".to_string(),
            dia_chi: "12 Lý Thường Kiệt".to_string(),
            quan_huyen: "Hoàn Kiếm".to_string(),
            tinh_thanh: "Hà Nội".to_string(),
            mac_dinh: false,
        }
    }

    #[test]
    fn test_phone_must_be_digits_only() {
        let mut form = valid_address();
        assert!(form.validate().is_ok());

        form.so_dien_thoai = "09123-45678".to_string();
        assert!(form.validate().is_err());

        form.so_dien_thoai = "091234".to_string();
        assert!(form.validate().is_err(), "too short");
    }

    #[test]
    fn test_address_requires_all_fields() {
        let mut form = valid_address();
        form.quan_huyen = String::new();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_profile_phone_is_optional_but_validated() {
        let mut form = ProfileForm {
            ho: "Nguyen".to_string(),
            ten: "A".to_string(),
            ..ProfileForm::default()
        };
        assert!(form.validate().is_ok(), "empty phone is fine");

        form.so_dien_thoai = "abc".to_string();
        assert!(form.validate().is_err());

        form.so_dien_thoai = "0912345678".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_password_rules() {
        let mut form = PasswordForm {
            current_password: "cũ-mật-khẩu".to_string(),
            new_password: "mới123".to_string(),
            confirm_password: "mới123".to_string(),
        };
        assert!(form.validate().is_ok());

        form.new_password = "ngắn".to_string();
        form.confirm_password = "ngắn".to_string();
        assert!(form.validate().is_err(), "under six characters");

        form.new_password = "đủ-dài-rồi".to_string();
        form.confirm_password = "khác-hẳn".to_string();
        assert!(form.validate().is_err(), "mismatched confirmation");
    }

    #[tokio::test]
    async fn test_invalid_dialog_redisplays_with_inline_message() {
        let mut page = ProfilePage::new(offline_api());
        page.open_change_password();

        let update = page.submit_password(PasswordForm::default()).await;
        // The dialog did not close and nothing was posted.
        assert_eq!(page.open_dialog(), Some(OpenDialog::ChangePassword));
        assert!(update
            .patches
            .iter()
            .any(|p| matches!(p, DomPatch::Show { target } if target == PASSWORD_ERROR)));
        assert!(!update
            .patches
            .iter()
            .any(|p| matches!(p, DomPatch::CloseModal { .. })));
    }

    #[tokio::test]
    async fn test_server_failure_keeps_dialog_open_with_message() {
        // Port 9 is closed; the POST fails at the transport layer.
        let mut page = ProfilePage::new(offline_api());
        page.open_add_address();

        let update = page.submit_address(valid_address()).await;
        assert_eq!(page.open_dialog(), Some(OpenDialog::AddAddress));
        assert!(update.patches.iter().any(|p| matches!(
            p,
            DomPatch::SetText { target, text }
                if target == ADDRESS_ERROR && text == "Lỗi mạng xảy ra"
        )));
    }

    #[tokio::test]
    async fn test_declined_delete_makes_no_request() {
        let page = ProfilePage::new(offline_api());
        let update = page.delete_address(AddressId::new(3), |_| false).await;
        assert_eq!(update, UiUpdate::new());
    }

    #[test]
    fn test_edit_address_remembers_its_id() {
        let mut page = ProfilePage::new(offline_api());
        page.open_edit_address(AddressId::new(9));
        assert_eq!(
            page.open_dialog(),
            Some(OpenDialog::EditAddress(AddressId::new(9)))
        );

        let update = page.close_dialog();
        assert!(update
            .patches
            .iter()
            .any(|p| matches!(p, DomPatch::CloseModal { target } if target == ADDRESS_MODAL)));
        assert_eq!(page.open_dialog(), None);
    }
}
