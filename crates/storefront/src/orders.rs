//! The buyer's order history.
//!
//! One page of orders is fetched at a time; the status tabs are pure
//! predicates applied to that page in memory. Switching tabs never
//! fetches, which is why [`OrderHistory::set_tab`] is synchronous.

use tracing::warn;

use wildmint_client::{ApiClient, Order, OrderListQuery};
use wildmint_core::{NoticeCenter, OrderId, OrderTab};

/// Paged order list with client-side tab filtering.
pub struct OrderHistory {
    api: ApiClient,
    orders: Vec<Order>,
    page: u32,
    total_pages: u32,
    tab: OrderTab,
    loading: bool,
    notices: NoticeCenter,
}

impl OrderHistory {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            orders: Vec::new(),
            page: 1,
            total_pages: 1,
            tab: OrderTab::ToPay,
            loading: false,
            notices: NoticeCenter::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Every order on the fetched page, regardless of tab.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The fetched page restricted to the active tab.
    #[must_use]
    pub fn visible_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| self.tab.matches(o.status))
            .collect()
    }

    /// How many orders on this page fall under a tab, for tab badges.
    #[must_use]
    pub fn count_for(&self, tab: OrderTab) -> usize {
        self.orders.iter().filter(|o| tab.matches(o.status)).count()
    }

    #[must_use]
    pub const fn tab(&self) -> OrderTab {
        self.tab
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
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
    // Tabs and pagination
    // =========================================================================

    /// Switches the active tab. Re-filters the already-fetched page.
    pub const fn set_tab(&mut self, tab: OrderTab) {
        self.tab = tab;
    }

    pub async fn go_to_page(&mut self, page: u32) {
        let page = page.clamp(1, self.total_pages.max(1));
        if page == self.page {
            return;
        }
        self.page = page;
        self.refresh().await;
    }

    pub async fn next_page(&mut self) {
        self.go_to_page(self.page.saturating_add(1)).await;
    }

    pub async fn previous_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1)).await;
    }

    // =========================================================================
    // Fetch and actions
    // =========================================================================

    /// Fetches the current page of the buyer's orders.
    pub async fn refresh(&mut self) {
        self.loading = true;
        let query = OrderListQuery {
            page: Some(self.page),
            ..OrderListQuery::default()
        };
        match self.api.list_orders(&query).await {
            Ok(page) => {
                self.orders = page.items;
                self.total_pages = page.total_pages.max(1);
            }
            Err(e) => {
                warn!(error = %e, "order history fetch failed, showing empty page");
                self.orders = Vec::new();
                self.total_pages = 1;
                self.notices.error(e.user_message());
            }
        }
        self.loading = false;
    }

    /// Asks the server to cancel an order, then re-reads the page. The
    /// server decides whether the cancellation is allowed.
    pub async fn cancel_order(&mut self, order_id: OrderId) -> bool {
        match self.api.cancel_order(order_id).await {
            Ok(()) => {
                self.notices.success("Order cancelled.");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.notices.error(e.user_message());
                false
            }
        }
    }
}
