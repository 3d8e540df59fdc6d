//! Product catalog browsing with filters and pagination.
//!
//! Every filter setter resets the page cursor to 1 and issues exactly one
//! fetch; page navigation keeps the filters and fetches once. A failed or
//! malformed listing degrades to an empty page with a notice.

use tracing::warn;

use wildmint_client::{ApiClient, Product, ProductFilter};
use wildmint_core::NoticeCenter;

use rust_decimal::Decimal;

/// Catalog listing state for the shop page.
pub struct CatalogController {
    api: ApiClient,
    filter: ProductFilter,
    products: Vec<Product>,
    total_pages: u32,
    loading: bool,
    notices: NoticeCenter,
}

impl CatalogController {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            filter: ProductFilter {
                page: Some(1),
                ..ProductFilter::default()
            },
            products: Vec::new(),
            total_pages: 1,
            loading: false,
            notices: NoticeCenter::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    /// Current 1-based page.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.filter.page.unwrap_or(1)
    }

    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
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

    // =========================================================================
    // Fetch
    // =========================================================================

    /// Fetches the page the current filter describes.
    pub async fn refresh(&mut self) {
        self.loading = true;
        match self.api.list_products(&self.filter).await {
            Ok(page) => {
                self.products = page.items;
                self.total_pages = page.total_pages.max(1);
            }
            Err(e) => {
                warn!(error = %e, "product listing failed, showing empty page");
                self.products = Vec::new();
                self.total_pages = 1;
                self.notices.error(e.user_message());
            }
        }
        self.loading = false;
    }

    // =========================================================================
    // Filters (each resets the page and fetches once)
    // =========================================================================

    pub async fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.filter.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self.reset_page();
        self.refresh().await;
    }

    pub async fn set_brand(&mut self, brand: Option<String>) {
        self.filter.brand = brand;
        self.reset_page();
        self.refresh().await;
    }

    pub async fn set_category(&mut self, category: Option<String>) {
        self.filter.category = category;
        self.reset_page();
        self.refresh().await;
    }

    pub async fn set_price_range(&mut self, min: Option<Decimal>, max: Option<Decimal>) {
        self.filter.min_price = min;
        self.filter.max_price = max;
        self.reset_page();
        self.refresh().await;
    }

    /// Restricts the listing to featured products (the home-page strip).
    pub async fn set_featured_only(&mut self, featured: bool) {
        self.filter.featured = featured.then_some(true);
        self.reset_page();
        self.refresh().await;
    }

    /// Drops every filter and reloads the first page.
    pub async fn clear_filters(&mut self) {
        self.filter = ProductFilter {
            page: Some(1),
            ..ProductFilter::default()
        };
        self.refresh().await;
    }

    fn reset_page(&mut self) {
        self.filter.page = Some(1);
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Jumps to a page, clamped to the known page range.
    pub async fn go_to_page(&mut self, page: u32) {
        let page = page.clamp(1, self.total_pages.max(1));
        if page == self.page() {
            return;
        }
        self.filter.page = Some(page);
        self.refresh().await;
    }

    pub async fn next_page(&mut self) {
        self.go_to_page(self.page().saturating_add(1)).await;
    }

    pub async fn previous_page(&mut self) {
        self.go_to_page(self.page().saturating_sub(1)).await;
    }
}
