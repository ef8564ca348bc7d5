//! PawMart Admin - back-office page controllers.
//!
//! Each page the admin panel serves gets one controller here, mirroring the
//! scripts the pages load:
//!
//! - [`pages::products`] - product table with filters, editor modal, delete
//! - [`pages::customers`] - customer list, stats, detail modal, delete
//! - [`pages::orders`] - order list, stats, detail modal, status update
//! - [`pages::dashboard`] - quick stats, sales chart, periodic refresh
//!
//! Controllers talk to the shop server through [`api::AdminApi`] and return
//! [`pawmart_core::ui::UiUpdate`] values for the host shell to apply. The
//! server, persistence, and session handling are external; the admin panel
//! only consumes the JSON endpoints.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod pages;
