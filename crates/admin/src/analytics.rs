//! Sales analytics dashboard.
//!
//! Three independent reports fetched concurrently. Each degrades on its
//! own: a failed or malformed report shows as its empty default with a
//! notice while the other two still render.

use tracing::warn;

use wildmint_client::{ApiClient, ProductPerformanceRow, RevenueStatistics, SalesReportRow};
use wildmint_core::NoticeCenter;

/// Aggregated analytics state for the admin dashboard.
pub struct Dashboard {
    api: ApiClient,
    sales: Vec<SalesReportRow>,
    revenue: Option<RevenueStatistics>,
    performance: Vec<ProductPerformanceRow>,
    loading: bool,
    notices: NoticeCenter,
}

impl Dashboard {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            sales: Vec::new(),
            revenue: None,
            performance: Vec::new(),
            loading: false,
            notices: NoticeCenter::default(),
        }
    }

    /// Daily sales rows, oldest first as the server returns them.
    #[must_use]
    pub fn sales(&self) -> &[SalesReportRow] {
        &self.sales
    }

    #[must_use]
    pub fn revenue(&self) -> Option<&RevenueStatistics> {
        self.revenue.as_ref()
    }

    #[must_use]
    pub fn performance(&self) -> &[ProductPerformanceRow] {
        &self.performance
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn notices(&self) -> &NoticeCenter {
        &self.notices
    }

    pub const fn notices_mut(&mut self) -> &mut NoticeCenter {
        &mut self.notices
    }

    /// Fetches all three reports concurrently.
    pub async fn refresh(&mut self) {
        self.loading = true;
        let (sales, revenue, performance) = tokio::join!(
            self.api.sales_report(),
            self.api.revenue_statistics(),
            self.api.product_performance(),
        );

        match sales {
            Ok(rows) => self.sales = rows,
            Err(e) => {
                warn!(error = %e, "sales report fetch failed");
                self.sales = Vec::new();
                self.notices.error(e.user_message());
            }
        }
        match revenue {
            Ok(stats) => self.revenue = Some(stats),
            Err(e) => {
                warn!(error = %e, "revenue statistics fetch failed");
                self.revenue = None;
                self.notices.error(e.user_message());
            }
        }
        match performance {
            Ok(rows) => self.performance = rows,
            Err(e) => {
                warn!(error = %e, "product performance fetch failed");
                self.performance = Vec::new();
                self.notices.error(e.user_message());
            }
        }
        self.loading = false;
    }
}
