//! PawMart Storefront - shop-facing page controllers.
//!
//! One controller per page script the shop serves:
//!
//! - [`pages::catalog`] - product card filtering and add-to-cart buttons
//! - [`pages::cart`] - quantity changes, removals, promo codes
//! - [`pages::checkout`] - selection arithmetic and the order submission
//! - [`pages::profile`] - profile, address, and password dialogs
//!
//! Controllers call the shop server through [`api::ShopApi`] and return
//! [`pawmart_core::ui::UiUpdate`] values for the host shell to apply. The
//! server holds the cart; the client only sends mutation intents and
//! redraws the aggregates it gets back.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod pages;
