//! End-to-end flows for the storefront pages against the stub shop server.

use std::time::{Duration, Instant};

use pawmart_core::ui::DomPatch;
use pawmart_core::{AddressId, Price, ProductId};

use pawmart_storefront::api::ShopApi;
use pawmart_storefront::config::StorefrontConfig;
use pawmart_storefront::pages::cart::{CartLine, CartPage};
use pawmart_storefront::pages::catalog::{ButtonPhase, CatalogPage, ProductCard};
use pawmart_storefront::pages::profile::{PasswordForm, ProfilePage};

use pawmart_integration_tests::spawn_stub;

fn api_for(base_url: &str) -> ShopApi {
    let config = StorefrontConfig::for_base_url(base_url.parse().expect("stub url"));
    ShopApi::new(&config)
}

fn seeded_cart(api: ShopApi) -> CartPage {
    CartPage::new(
        api,
        vec![
            CartLine {
                product_id: ProductId::new(1),
                quantity: 2,
            },
            CartLine {
                product_id: ProductId::new(2),
                quantity: 1,
            },
        ],
    )
}

fn text_of(update: &pawmart_core::ui::UiUpdate, target: &str) -> Option<String> {
    update.patches.iter().find_map(|p| match p {
        DomPatch::SetText { target: t, text } if t == target => Some(text.clone()),
        _ => None,
    })
}

#[tokio::test]
async fn quantity_update_patches_only_the_touched_row_and_aggregates() {
    let stub = spawn_stub().await;
    let mut page = seeded_cart(api_for(&stub.base_url));

    let update = page.increase(ProductId::new(1)).await;

    // 3 × 185.000 for the touched row; aggregates recomputed server-side.
    assert_eq!(
        text_of(&update, "cart-item-total-1").as_deref(),
        Some("555.000đ")
    );
    assert_eq!(text_of(&update, "subtotal").as_deref(), Some("580.000₫"));
    assert_eq!(text_of(&update, "cart-badge").as_deref(), Some("4"));
    // The other row was left alone.
    assert!(text_of(&update, "cart-item-total-2").is_none());
    assert_eq!(stub.state.lock().expect("state").cart.get(&1), Some(&3));
}

#[tokio::test]
async fn rejected_quantity_rolls_the_input_back() {
    let stub = spawn_stub().await;
    let mut page = seeded_cart(api_for(&stub.base_url));

    // Stock for product 2 is 8; ask for more.
    let update = page.update_quantity(ProductId::new(2), 50).await;

    assert!(update
        .toasts
        .iter()
        .any(|t| t.message == "Số lượng vượt quá tồn kho"));
    assert!(update.patches.iter().any(|p| matches!(
        p,
        DomPatch::SetValue { target, value }
            if target == "quantity-input-2" && value == "1"
    )));
    // Server cart unchanged.
    assert_eq!(stub.state.lock().expect("state").cart.get(&2), Some(&1));
}

#[tokio::test]
async fn removing_the_last_line_reloads_the_page() {
    let stub = spawn_stub().await;
    let mut page = CartPage::new(
        api_for(&stub.base_url),
        vec![CartLine {
            product_id: ProductId::new(1),
            quantity: 2,
        }],
    );

    let update = page.remove(ProductId::new(1), |_| true).await;

    assert!(update.patches.iter().any(|p| matches!(
        p,
        DomPatch::AddClass { target, class }
            if target == "cart-item-1" && class == "cart-item-removing"
    )));
    assert!(update
        .patches
        .iter()
        .any(|p| matches!(p, DomPatch::ReloadPage)));
    assert!(page.lines().is_empty());
}

#[tokio::test]
async fn sale10_promo_shows_discount_and_clears_the_input() {
    let stub = spawn_stub().await;
    let page = seeded_cart(api_for(&stub.base_url));

    let update = page.apply_promo("SALE10").await;

    assert_eq!(text_of(&update, "discount").as_deref(), Some("-50.000₫"));
    assert!(update.patches.iter().any(|p| matches!(
        p,
        DomPatch::SetValue { target, value } if target == "promo-code" && value.is_empty()
    )));
    // Subtotal 395.000, total after discount 345.000.
    assert_eq!(text_of(&update, "subtotal").as_deref(), Some("395.000₫"));
    assert_eq!(text_of(&update, "total-amount").as_deref(), Some("345.000₫"));
}

#[tokio::test]
async fn invalid_promo_leaves_the_display_untouched() {
    let stub = spawn_stub().await;
    let page = seeded_cart(api_for(&stub.base_url));

    let update = page.apply_promo("GIAMGIA99").await;

    assert!(update
        .toasts
        .iter()
        .any(|t| t.message == "Mã giảm giá không hợp lệ"));
    assert!(text_of(&update, "discount").is_none());
    assert!(text_of(&update, "subtotal").is_none());
    assert_eq!(stub.state.lock().expect("state").discount, 0);
}

#[tokio::test]
async fn add_to_cart_button_walks_loading_success_reset() {
    let stub = spawn_stub().await;
    let now = Instant::now();
    let mut page = CatalogPage::new(
        api_for(&stub.base_url),
        vec![ProductCard {
            product_id: ProductId::new(1),
            pet_type: "dog".to_string(),
            brand: "Royal Canin".to_string(),
            price: Price::from_vnd(185_000),
        }],
    );

    page.begin_add_to_cart(ProductId::new(1), now);
    assert_eq!(page.button_phase(ProductId::new(1)), ButtonPhase::Loading);

    let update = page.finish_add_to_cart(ProductId::new(1), now).await;
    assert_eq!(page.button_phase(ProductId::new(1)), ButtonPhase::Success);
    // Seeded cart held 3 units; one more makes 4.
    assert_eq!(text_of(&update, "cart-badge").as_deref(), Some("4"));

    page.tick(now + Duration::from_secs(2));
    assert_eq!(page.button_phase(ProductId::new(1)), ButtonPhase::Idle);
}

#[tokio::test]
async fn profile_password_change_round_trips() {
    let stub = spawn_stub().await;
    let mut page = ProfilePage::new(api_for(&stub.base_url));
    page.open_change_password();

    let update = page
        .submit_password(PasswordForm {
            current_password: "mật-khẩu-cũ".to_string(),
            new_password: "mật-khẩu-mới".to_string(),
            confirm_password: "mật-khẩu-mới".to_string(),
        })
        .await;

    assert!(update
        .toasts
        .iter()
        .any(|t| t.message == "Đổi mật khẩu thành công!"));
    assert!(update.patches.iter().any(|p| matches!(
        p,
        DomPatch::CloseModal { target } if target == "change-password-modal"
    )));
    drop(stub);
}

#[tokio::test]
async fn wrong_current_password_stays_in_the_dialog() {
    let stub = spawn_stub().await;
    let mut page = ProfilePage::new(api_for(&stub.base_url));
    page.open_change_password();

    let update = page
        .submit_password(PasswordForm {
            current_password: "sai-mật-khẩu".to_string(),
            new_password: "mật-khẩu-mới".to_string(),
            confirm_password: "mật-khẩu-mới".to_string(),
        })
        .await;

    assert!(update.patches.iter().any(|p| matches!(
        p,
        DomPatch::SetText { target, text }
            if target == "change-password-error" && text == "Mật khẩu hiện tại không đúng"
    )));
    assert!(!update
        .patches
        .iter()
        .any(|p| matches!(p, DomPatch::CloseModal { .. })));
    drop(stub);
}

#[tokio::test]
async fn address_delete_posts_after_native_confirm() {
    let stub = spawn_stub().await;
    let page = ProfilePage::new(api_for(&stub.base_url));

    let update = page.delete_address(AddressId::new(3), |_| true).await;

    assert!(update.toasts.iter().any(|t| t.message == "Đã xóa địa chỉ!"));
    assert!(update
        .patches
        .iter()
        .any(|p| matches!(p, DomPatch::ReloadPage)));
    drop(stub);
}
