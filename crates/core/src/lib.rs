//! PawMart Core - Shared types library.
//!
//! This crate provides the common vocabulary used by both PawMart page
//! layers:
//! - `storefront` - shop-facing pages (catalog, cart, checkout, profile)
//! - `admin` - back-office pages (products, customers, orders, dashboard)
//!
//! # Architecture
//!
//! The core crate contains only types and small deterministic mechanisms -
//! no I/O, no HTTP clients. Controllers in the app crates build on:
//!
//! - [`types`] - newtype ids, VND prices, and status enums
//! - [`envelope`] - the `{success, message, ...}` response wrapper
//! - [`ui`] - typed UI effects (toasts, dialogs, DOM patches)
//! - [`supersede`] - monotonic request tickets for stale-response discard
//! - [`timing`] - debounce and periodic-refresh clocks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dates;
pub mod envelope;
pub mod html;
pub mod supersede;
pub mod timing;
pub mod types;
pub mod ui;

pub use envelope::Envelope;
pub use types::*;
