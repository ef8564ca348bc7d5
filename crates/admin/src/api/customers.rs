//! Customer endpoints.

use serde::Deserialize;
use tracing::instrument;

use pawmart_core::{CustomerId, CustomerStatus, OrderId, OrderStatus, Price};

use super::{AdminApi, ApiError};

/// A customer row in the admin list.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub total_orders: i64,
    pub total_spent: Price,
    pub status: CustomerStatus,
}

/// The full record shown in the detail modal.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetail {
    pub id: CustomerId,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub total_orders: i64,
    pub total_spent: Price,
    #[serde(default)]
    pub last_order_date: Option<String>,
    pub status: CustomerStatus,
    #[serde(default)]
    pub recent_orders: Vec<CustomerOrder>,
}

/// One of a customer's recent orders.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerOrder {
    pub id: OrderId,
    pub date: String,
    pub total: Price,
    pub status: OrderStatus,
}

/// Aggregate counters above the customer table.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CustomerStats {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub active: i64,
    #[serde(default)]
    pub new_this_month: i64,
    #[serde(default)]
    pub vip: i64,
}

#[derive(Debug, Deserialize)]
struct CustomerListPayload {
    customers: Vec<CustomerSummary>,
}

#[derive(Debug, Deserialize)]
struct CustomerDetailPayload {
    customer: CustomerDetail,
}

#[derive(Debug, Deserialize)]
struct CustomerStatsPayload {
    stats: CustomerStats,
}

impl AdminApi {
    /// Fetch the customer list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<CustomerSummary>, ApiError> {
        let payload: CustomerListPayload = self.get_envelope("/api/admin/customers").await?;
        Ok(payload.customers)
    }

    /// Fetch one customer with their recent orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn customer_detail(&self, id: CustomerId) -> Result<CustomerDetail, ApiError> {
        let payload: CustomerDetailPayload = self
            .get_envelope(&format!("/api/admin/customers/{id}"))
            .await?;
        Ok(payload.customer)
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), ApiError> {
        self.delete_envelope::<serde_json::Value>(&format!("/api/admin/customers/{id}"))
            .await?;
        Ok(())
    }

    /// Fetch the aggregate customer counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self))]
    pub async fn customer_stats(&self) -> Result<CustomerStats, ApiError> {
        let payload: CustomerStatsPayload =
            self.get_envelope("/api/admin/customer-stats").await?;
        Ok(payload.stats)
    }
}
