//! Dashboard endpoints: quick stats, the revenue chart, and the two
//! overview tables.

use serde::Deserialize;
use tracing::instrument;

use pawmart_core::{Price, ProductId};

use super::orders::OrderSummary;
use super::{AdminApi, ApiError};

/// The quick-stats block, grouped the way the cards are laid out.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct QuickStats {
    pub products: ProductCounts,
    pub orders: OrderCounts,
    pub users: UserCounts,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ProductCounts {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub in_stock: i64,
    #[serde(default)]
    pub low_stock: i64,
    #[serde(default)]
    pub out_of_stock: i64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OrderCounts {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub pending: i64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UserCounts {
    #[serde(default)]
    pub total: i64,
}

/// Revenue line-chart data for one period.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

/// A row of the low-stock overview table.
#[derive(Debug, Clone, Deserialize)]
pub struct LowStockProduct {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub price: Price,
}

#[derive(Debug, Deserialize)]
struct QuickStatsPayload {
    data: QuickStats,
}

#[derive(Debug, Deserialize)]
struct ChartPayload {
    #[serde(rename = "chartData")]
    chart_data: ChartData,
}

#[derive(Debug, Deserialize)]
struct RecentOrdersPayload {
    orders: Vec<OrderSummary>,
}

#[derive(Debug, Deserialize)]
struct LowStockPayload {
    products: Vec<LowStockProduct>,
}

impl AdminApi {
    /// Fetch the quick-stats block.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self))]
    pub async fn quick_stats(&self) -> Result<QuickStats, ApiError> {
        let payload: QuickStatsPayload = self.get_envelope("/api/admin/quick-stats").await?;
        Ok(payload.data)
    }

    /// Fetch the revenue chart for a period of `days` days.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self))]
    pub async fn sales_chart(&self, days: u32) -> Result<ChartData, ApiError> {
        let payload: ChartPayload = self
            .get_envelope(&format!("/api/admin/sales-chart?period={days}"))
            .await?;
        Ok(payload.chart_data)
    }

    /// Fetch the most recent orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self))]
    pub async fn recent_orders(&self) -> Result<Vec<OrderSummary>, ApiError> {
        let payload: RecentOrdersPayload =
            self.get_envelope("/api/admin/recent-orders").await?;
        Ok(payload.orders)
    }

    /// Fetch products running low on stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports failure.
    #[instrument(skip(self))]
    pub async fn low_stock_products(&self) -> Result<Vec<LowStockProduct>, ApiError> {
        let payload: LowStockPayload =
            self.get_envelope("/api/admin/low-stock-products").await?;
        Ok(payload.products)
    }
}
