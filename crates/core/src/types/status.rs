//! Status enums for products, orders, and customers.
//!
//! Each enum carries its wire spelling (serde rename), the Vietnamese label
//! shown in tables and modals, and the CSS badge class the pages attach to
//! it.

use serde::{Deserialize, Serialize};

/// Stock status derived from a product's on-hand quantity.
///
/// Never sent by the server; the product pages compute it locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Quantities at or below this count as low stock.
    pub const LOW_STOCK_THRESHOLD: i64 = 10;

    /// Derive the status from a quantity.
    ///
    /// Zero (or anything below) is out of stock, up to
    /// [`Self::LOW_STOCK_THRESHOLD`] is low stock, more is in stock.
    #[must_use]
    pub const fn from_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            Self::OutOfStock
        } else if quantity <= Self::LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    /// Wire/CSS value (`in-stock`, `low-stock`, `out-of-stock`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in-stock",
            Self::LowStock => "low-stock",
            Self::OutOfStock => "out-of-stock",
        }
    }

    /// Label shown in the admin tables.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InStock => "Còn hàng",
            Self::LowStock => "Sắp hết",
            Self::OutOfStock => "Hết hàng",
        }
    }

    /// Badge class for the status cell.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::InStock => "status-in-stock",
            Self::LowStock => "status-low-stock",
            Self::OutOfStock => "status-out-of-stock",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-stock" => Ok(Self::InStock),
            "low-stock" => Ok(Self::LowStock),
            "out-of-stock" => Ok(Self::OutOfStock),
            _ => Err(format!("invalid stock status: {s}")),
        }
    }
}

/// Order lifecycle status.
///
/// The canonical wire spelling is `cancelled`; the alias accepts the
/// single-l spelling some backend responses used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    #[serde(alias = "canceled")]
    Cancelled,
}

impl OrderStatus {
    /// Wire value (`pending`, `shipped`, `delivered`, `cancelled`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Label shown in order tables and modals.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Chờ Xử Lý",
            Self::Shipped => "Đang Giao",
            Self::Delivered => "Đã Giao",
            Self::Cancelled => "Đã Hủy",
        }
    }

    /// Badge class for the status cell.
    #[must_use]
    pub fn badge_class(&self) -> String {
        format!("status-badge status-{}", self.as_str())
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Customer account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl CustomerStatus {
    /// Wire value (`active`, `inactive`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Label shown in the customer table.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Active => "Hoạt Động",
            Self::Inactive => "Không Hoạt Động",
        }
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_stock_status_from_quantity_boundaries() {
        assert_eq!(StockStatus::from_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_quantity(1), StockStatus::LowStock);
        assert_eq!(StockStatus::from_quantity(10), StockStatus::LowStock);
        assert_eq!(StockStatus::from_quantity(11), StockStatus::InStock);
        assert_eq!(StockStatus::from_quantity(500), StockStatus::InStock);
    }

    #[test]
    fn test_stock_status_negative_quantity_is_out_of_stock() {
        assert_eq!(StockStatus::from_quantity(-3), StockStatus::OutOfStock);
    }

    #[test]
    fn test_order_status_accepts_both_spellings() {
        let double: OrderStatus = serde_json::from_str("\"cancelled\"").expect("double-l");
        let single: OrderStatus = serde_json::from_str("\"canceled\"").expect("single-l");
        assert_eq!(double, OrderStatus::Cancelled);
        assert_eq!(single, OrderStatus::Cancelled);
    }

    #[test]
    fn test_order_status_serializes_canonical_spelling() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).expect("serialize");
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn test_order_status_from_str() {
        assert_eq!(
            OrderStatus::from_str("canceled").expect("parse"),
            OrderStatus::Cancelled
        );
        assert!(OrderStatus::from_str("refunded").is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(StockStatus::LowStock.label(), "Sắp hết");
        assert_eq!(OrderStatus::Delivered.label(), "Đã Giao");
        assert_eq!(CustomerStatus::Inactive.label(), "Không Hoạt Động");
    }
}
