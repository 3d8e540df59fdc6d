//! Back-office order board.
//!
//! Fetches one page of orders under server-side filters (status, date
//! range) and lets the admin push orders through their status flow. A
//! requested transition is applied optimistically through the same
//! staged/settled guard the storefront cart uses, and reverts if the
//! server rejects it. What transitions are offered at all comes from
//! the per-payment-method flow tables; the server stays authoritative
//! and may still refuse.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use wildmint_client::{ApiClient, ApiError, Order, OrderListQuery};
use wildmint_core::{
    NoticeCenter, OptimisticValue, OrderId, OrderStatus, Reconciliation, UpdateTicket,
};

/// A staged status change awaiting its server response.
#[derive(Debug, Clone)]
pub struct PendingStatusChange {
    ticket: UpdateTicket,
    order_id: OrderId,
    status: OrderStatus,
    staged: Vec<Order>,
}

impl PendingStatusChange {
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.order_id
    }

    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }
}

/// Paged, filterable order list with optimistic status changes.
pub struct OrderBoard {
    api: ApiClient,
    orders: OptimisticValue<Vec<Order>>,
    query: OrderListQuery,
    total_pages: u32,
    selected: HashSet<OrderId>,
    loading: bool,
    notices: NoticeCenter,
}

impl OrderBoard {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            orders: OptimisticValue::new(Vec::new()),
            query: OrderListQuery {
                page: Some(1),
                ..OrderListQuery::default()
            },
            total_pages: 1,
            selected: HashSet::new(),
            loading: false,
            notices: NoticeCenter::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The orders the board should render right now.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        self.orders.displayed()
    }

    #[must_use]
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders().iter().find(|o| o.id == order_id)
    }

    /// Status options the UI should offer for an order, in flow order.
    /// Empty for terminal statuses and unknown orders.
    #[must_use]
    pub fn offered_for(&self, order_id: OrderId) -> &'static [OrderStatus] {
        self.order(order_id)
            .map_or(&[], Order::offered_transitions)
    }

    #[must_use]
    pub const fn query(&self) -> &OrderListQuery {
        &self.query
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.query.page.unwrap_or(1)
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
    // Selection
    // =========================================================================

    #[must_use]
    pub const fn selected_ids(&self) -> &HashSet<OrderId> {
        &self.selected
    }

    /// Whether every loaded order is selected. An empty page counts as
    /// not-all-selected.
    #[must_use]
    pub fn all_selected(&self) -> bool {
        !self.orders().is_empty() && self.orders().iter().all(|o| self.selected.contains(&o.id))
    }

    pub fn toggle_selected(&mut self, order_id: OrderId) {
        if self.order(order_id).is_none() {
            return;
        }
        if !self.selected.remove(&order_id) {
            self.selected.insert(order_id);
        }
    }

    /// Selects exactly the orders loaded on this page, or clears the
    /// selection when they are all already selected.
    pub fn toggle_select_all(&mut self) {
        if self.all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.orders().iter().map(|o| o.id).collect();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn prune_selection(&mut self) {
        let ids: HashSet<OrderId> = self.orders.displayed().iter().map(|o| o.id).collect();
        self.selected.retain(|id| ids.contains(id));
    }

    // =========================================================================
    // Filters and pagination (each filter change refetches page 1)
    // =========================================================================

    pub async fn set_status_filter(&mut self, status: Option<OrderStatus>) {
        self.query.status = status;
        self.query.page = Some(1);
        self.refresh().await;
    }

    pub async fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.query.start_date = start;
        self.query.end_date = end;
        self.query.page = Some(1);
        self.refresh().await;
    }

    pub async fn clear_filters(&mut self) {
        self.query = OrderListQuery {
            page: Some(1),
            ..OrderListQuery::default()
        };
        self.refresh().await;
    }

    pub async fn go_to_page(&mut self, page: u32) {
        let page = page.clamp(1, self.total_pages.max(1));
        if page == self.page() {
            return;
        }
        self.query.page = Some(page);
        self.refresh().await;
    }

    pub async fn next_page(&mut self) {
        self.go_to_page(self.page().saturating_add(1)).await;
    }

    pub async fn previous_page(&mut self) {
        self.go_to_page(self.page().saturating_sub(1)).await;
    }

    // =========================================================================
    // Fetch
    // =========================================================================

    /// Fetches the page the current query describes, superseding any
    /// in-flight status change.
    pub async fn refresh(&mut self) {
        self.loading = true;
        match self.api.list_orders(&self.query).await {
            Ok(page) => {
                self.orders.reset(page.items);
                self.total_pages = page.total_pages.max(1);
                self.prune_selection();
            }
            Err(e) => {
                warn!(error = %e, "order board fetch failed, showing empty page");
                self.orders.reset(Vec::new());
                self.total_pages = 1;
                self.selected.clear();
                self.notices.error(e.user_message());
            }
        }
        self.loading = false;
    }

    // =========================================================================
    // Status changes
    // =========================================================================

    /// Stages a status change and shows it immediately. Returns `None`
    /// for an unknown order or a transition the flow does not offer.
    pub fn stage_status(
        &mut self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Option<PendingStatusChange> {
        let Some(order) = self.order(order_id) else {
            debug!(%order_id, "status change for unknown order ignored");
            return None;
        };
        if !order.offered_transitions().contains(&status) {
            debug!(%order_id, status = %status.as_str(), "transition not offered, ignored");
            return None;
        }
        let staged: Vec<Order> = self
            .orders()
            .iter()
            .cloned()
            .map(|mut o| {
                if o.id == order_id {
                    o.status = status;
                }
                o
            })
            .collect();
        let ticket = self.orders.stage(staged.clone());
        Some(PendingStatusChange {
            ticket,
            order_id,
            status,
            staged,
        })
    }

    /// Settles a successful response: the staged page becomes confirmed.
    pub fn commit_status(&mut self, change: PendingStatusChange) -> Reconciliation {
        self.orders.acknowledge(change.ticket, change.staged)
    }

    /// Settles a failed response, reverting the display if the change
    /// was still the newest one.
    pub fn roll_back_status(
        &mut self,
        change: &PendingStatusChange,
        error: &ApiError,
    ) -> Reconciliation {
        let outcome = self.orders.reject(change.ticket);
        match outcome {
            Reconciliation::RolledBack => {
                self.notices.error(error.user_message());
            }
            _ => {
                debug!(order_id = %change.order_id, "superseded status change failed, ignoring");
            }
        }
        outcome
    }

    /// Requests a status transition, driving the optimistic change
    /// through the API. Returns `true` when the server accepted it.
    pub async fn change_status(&mut self, order_id: OrderId, status: OrderStatus) -> bool {
        let Some(change) = self.stage_status(order_id, status) else {
            return false;
        };
        match self.api.change_order_status(order_id, status).await {
            Ok(()) => {
                self.commit_status(change);
                true
            }
            Err(e) => {
                self.roll_back_status(&change, &e);
                false
            }
        }
    }

    /// Cancels every selected order, then re-reads the page.
    pub async fn cancel_selected(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        let ids: Vec<OrderId> = self.selected.iter().copied().collect();
        let mut failures = 0usize;
        for id in ids {
            if let Err(e) = self.api.cancel_order(id).await {
                warn!(order_id = %id, error = %e, "bulk cancel failed for order");
                failures += 1;
            }
        }
        self.selected.clear();
        self.refresh().await;
        if failures > 0 {
            self.notices
                .error(format!("Could not cancel {failures} order(s)."));
        } else {
            self.notices.success("Selected orders cancelled.");
        }
    }
}
