//! Sales analytics endpoints used by the admin dashboard.

use tracing::instrument;

use crate::error::ApiError;
use crate::response::parse_list;
use crate::types::{ProductPerformanceRow, RevenueStatistics, SalesReportRow};

use super::ApiClient;

impl ApiClient {
    /// Daily sales totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not a
    /// listing.
    #[instrument(skip(self))]
    pub async fn sales_report(&self) -> Result<Vec<SalesReportRow>, ApiError> {
        let request = self.get_authed("/analytics/sales-report")?;
        let raw: serde_json::Value = self.execute_json(request).await?;
        parse_list(raw)
    }

    /// Aggregate revenue figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn revenue_statistics(&self) -> Result<RevenueStatistics, ApiError> {
        let request = self.get_authed("/analytics/revenue-statistics")?;
        self.execute_json(request).await
    }

    /// Per-product sales totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not a
    /// listing.
    #[instrument(skip(self))]
    pub async fn product_performance(&self) -> Result<Vec<ProductPerformanceRow>, ApiError> {
        let request = self.get_authed("/analytics/product-performance")?;
        let raw: serde_json::Value = self.execute_json(request).await?;
        parse_list(raw)
    }
}
