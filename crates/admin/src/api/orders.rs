//! Order endpoints.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use pawmart_core::{OrderId, OrderStatus, Price};

use super::{AdminApi, ApiError};

/// An order row in the admin list (also the shape of the dashboard's
/// recent-orders feed).
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub customer_name: String,
    pub date: String,
    pub total: Price,
    pub status: OrderStatus,
}

/// The full record shown in the detail modal.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    pub id: OrderId,
    pub customer: OrderCustomer,
    pub shipping: ShippingInfo,
    pub items: Vec<OrderLineItem>,
    pub total: Price,
    pub status: OrderStatus,
}

/// The ordering customer's contact block.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCustomer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// The delivery block.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingInfo {
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// One purchased line.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineItem {
    pub product_name: String,
    pub quantity: i64,
    pub price: Price,
}

/// Aggregate counters above the order table.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OrderStats {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub pending: i64,
    #[serde(default)]
    pub shipped: i64,
    #[serde(default)]
    pub delivered: i64,
}

#[derive(Debug, Deserialize)]
struct OrderListPayload {
    orders: Vec<OrderSummary>,
}

#[derive(Debug, Deserialize)]
struct OrderDetailPayload {
    order: OrderDetail,
}

#[derive(Debug, Deserialize)]
struct OrderStatsPayload {
    stats: OrderStats,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: OrderStatus,
}

impl AdminApi {
    /// Fetch the order list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderSummary>, ApiError> {
        let payload: OrderListPayload = self.get_envelope("/api/admin/orders").await?;
        Ok(payload.orders)
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order_detail(&self, id: OrderId) -> Result<OrderDetail, ApiError> {
        let payload: OrderDetailPayload =
            self.get_envelope(&format!("/api/admin/orders/{id}")).await?;
        Ok(payload.order)
    }

    /// Set an order's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        self.put_envelope::<_, serde_json::Value>(
            &format!("/api/admin/orders/{id}/status"),
            &StatusBody { status },
        )
        .await?;
        Ok(())
    }

    /// Fetch the aggregate order counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self))]
    pub async fn order_stats(&self) -> Result<OrderStats, ApiError> {
        let payload: OrderStatsPayload = self.get_envelope("/api/admin/order-stats").await?;
        Ok(payload.stats)
    }
}
