//! Back-office page controllers.
//!
//! One controller struct per admin page, each owning its in-memory list,
//! filter state, and any pending confirmation. State lives for the page's
//! lifetime only; every mutating action re-fetches from the server instead
//! of patching locally.

pub mod confirm;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
