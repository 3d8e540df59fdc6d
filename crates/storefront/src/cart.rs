//! Cart view-state with optimistic edits.
//!
//! The displayed cart is an [`OptimisticValue`]: quantity edits and
//! removals show immediately, each tagged with a ticket, and the server
//! response settles or reverts them. Staging and settling are separate
//! synchronous steps so an embedder that spawns requests and receives
//! responses as messages can reconcile them in arrival order; the async
//! methods drive both steps for callers that simply await.
//!
//! The cart is never the source of truth. A full [`refresh`] overwrites
//! whatever is displayed, superseding any in-flight edit
//! (last-read-wins).
//!
//! [`refresh`]: CartController::refresh

use std::collections::HashSet;

use tracing::{debug, warn};

use wildmint_client::{ApiClient, ApiError, CartLine};
use wildmint_core::{
    CartLineId, Money, NoticeCenter, OptimisticValue, ProductId, Reconciliation, UpdateTicket,
};

/// A staged cart edit awaiting its server response.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    ticket: UpdateTicket,
    line_id: CartLineId,
    quantity: u32,
    staged: Vec<CartLine>,
}

impl PendingEdit {
    #[must_use]
    pub const fn line_id(&self) -> CartLineId {
        self.line_id
    }

    /// Requested quantity; zero means the line is being removed.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub const fn is_removal(&self) -> bool {
        self.quantity == 0
    }
}

/// Buyer cart state: server cart copy, optimistic edits, selection set.
pub struct CartController {
    api: ApiClient,
    cart: OptimisticValue<Vec<CartLine>>,
    selected: HashSet<CartLineId>,
    notices: NoticeCenter,
}

impl CartController {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cart: OptimisticValue::new(Vec::new()),
            selected: HashSet::new(),
            notices: NoticeCenter::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The lines the view should render right now.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.displayed()
    }

    #[must_use]
    pub fn line(&self, line_id: CartLineId) -> Option<&CartLine> {
        self.lines().iter().find(|l| l.id == line_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    /// Total item count across all lines, for the cart badge.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines().iter().map(|l| l.quantity).sum()
    }

    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines().iter().map(CartLine::line_total).sum()
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
    pub const fn selected_ids(&self) -> &HashSet<CartLineId> {
        &self.selected
    }

    #[must_use]
    pub fn selected_lines(&self) -> Vec<&CartLine> {
        self.lines()
            .iter()
            .filter(|l| self.selected.contains(&l.id))
            .collect()
    }

    #[must_use]
    pub fn selected_total(&self) -> Money {
        self.selected_lines()
            .into_iter()
            .map(CartLine::line_total)
            .sum()
    }

    /// Whether every displayed line is selected. An empty cart counts as
    /// not-all-selected.
    #[must_use]
    pub fn all_selected(&self) -> bool {
        !self.lines().is_empty() && self.lines().iter().all(|l| self.selected.contains(&l.id))
    }

    pub fn toggle_selected(&mut self, line_id: CartLineId) {
        if self.line(line_id).is_none() {
            return;
        }
        if !self.selected.remove(&line_id) {
            self.selected.insert(line_id);
        }
    }

    /// Selects every displayed line, or clears the selection when all are
    /// already selected.
    pub fn toggle_select_all(&mut self) {
        if self.all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.lines().iter().map(|l| l.id).collect();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Drops selected ids that no longer have a displayed line.
    fn prune_selection(&mut self) {
        let ids: HashSet<CartLineId> = self.cart.displayed().iter().map(|l| l.id).collect();
        self.selected.retain(|id| ids.contains(id));
    }

    // =========================================================================
    // Fetch
    // =========================================================================

    /// Replaces local state with a fresh server read.
    ///
    /// On failure the cart falls back to empty with a notice; the local
    /// copy is never trusted past a failed read.
    pub async fn refresh(&mut self) {
        match self.api.fetch_cart().await {
            Ok(lines) => {
                self.cart.reset(lines);
                self.prune_selection();
            }
            Err(e) => {
                warn!(error = %e, "cart fetch failed, showing empty cart");
                self.cart.reset(Vec::new());
                self.selected.clear();
                self.notices.error(e.user_message());
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product to the cart.
    ///
    /// Not optimistic: line ids are minted server-side, so the new line
    /// cannot be displayed until the server reports it.
    pub async fn add_product(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.notices.error("Quantity must be at least 1.");
            return;
        }
        match self.api.add_to_cart(product_id, quantity).await {
            Ok(lines) => {
                self.cart.reset(lines);
                self.prune_selection();
                self.notices.success("Added to cart.");
            }
            Err(e) => {
                self.notices.error(e.user_message());
            }
        }
    }

    /// Stages a quantity edit and shows it immediately. Zero stages a
    /// removal. Returns `None` for a line not in the cart.
    pub fn stage_quantity(&mut self, line_id: CartLineId, quantity: u32) -> Option<PendingEdit> {
        if self.line(line_id).is_none() {
            debug!(%line_id, "edit for unknown cart line ignored");
            return None;
        }
        let staged: Vec<CartLine> = if quantity == 0 {
            self.lines().iter().filter(|l| l.id != line_id).cloned().collect()
        } else {
            self.lines()
                .iter()
                .cloned()
                .map(|mut line| {
                    if line.id == line_id {
                        line.quantity = quantity;
                    }
                    line
                })
                .collect()
        };
        let ticket = self.cart.stage(staged.clone());
        Some(PendingEdit {
            ticket,
            line_id,
            quantity,
            staged,
        })
    }

    /// Settles a successful response for a staged edit.
    ///
    /// Quantity updates carry the server's cart; removals return no body,
    /// so `None` commits the staged cart as confirmed.
    pub fn commit_edit(
        &mut self,
        edit: PendingEdit,
        server_cart: Option<Vec<CartLine>>,
    ) -> Reconciliation {
        let value = server_cart.unwrap_or(edit.staged);
        let outcome = self.cart.acknowledge(edit.ticket, value);
        if outcome == Reconciliation::Committed {
            self.prune_selection();
        }
        outcome
    }

    /// Settles a failed response for a staged edit, reverting the display
    /// if the edit was still the newest one.
    pub fn roll_back_edit(&mut self, edit: &PendingEdit, error: &ApiError) -> Reconciliation {
        let outcome = self.cart.reject(edit.ticket);
        match outcome {
            Reconciliation::RolledBack => {
                self.notices.error(error.user_message());
                self.prune_selection();
            }
            _ => {
                debug!(line_id = %edit.line_id, "superseded cart edit failed, ignoring");
            }
        }
        outcome
    }

    /// Changes a line's quantity, driving the optimistic edit through the
    /// API. Quantity zero maps to a delete call.
    pub async fn change_quantity(&mut self, line_id: CartLineId, quantity: u32) {
        let Some(edit) = self.stage_quantity(line_id, quantity) else {
            return;
        };
        if edit.is_removal() {
            match self.api.delete_cart_line(line_id).await {
                Ok(()) => {
                    self.commit_edit(edit, None);
                }
                Err(e) => {
                    self.roll_back_edit(&edit, &e);
                }
            }
        } else {
            match self.api.update_cart_quantity(line_id, quantity).await {
                Ok(server) => {
                    self.commit_edit(edit, Some(server));
                }
                Err(e) => {
                    self.roll_back_edit(&edit, &e);
                }
            }
        }
    }

    /// Removes a line from the cart.
    pub async fn remove_line(&mut self, line_id: CartLineId) {
        self.change_quantity(line_id, 0).await;
    }

    /// Removes every selected line, then re-reads the cart once.
    pub async fn remove_selected(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        let ids: Vec<CartLineId> = self.selected.iter().copied().collect();
        let mut failures = 0usize;
        for id in ids {
            if let Err(e) = self.api.delete_cart_line(id).await {
                warn!(line_id = %id, error = %e, "bulk remove failed for line");
                failures += 1;
            }
        }
        self.refresh().await;
        if failures > 0 {
            self.notices
                .error(format!("Could not remove {failures} item(s)."));
        } else {
            self.notices.success("Selected items removed.");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use wildmint_client::{ApiConfig, InMemorySessionStore, ProductSnapshot};
    use wildmint_core::{CurrencyCode, ProductId};

    use super::*;

    fn controller() -> CartController {
        let config = ApiConfig::for_base_url("http://127.0.0.1:1".parse().expect("valid url"));
        let api = ApiClient::new(&config, Arc::new(InMemorySessionStore::new())).expect("client");
        CartController::new(api)
    }

    fn line(id: i64, quantity: u32, cents: i64) -> CartLine {
        CartLine {
            id: CartLineId::new(id),
            product_id: ProductId::new(id * 10),
            quantity,
            product: ProductSnapshot {
                name: format!("Product {id}"),
                price: Money::new(Decimal::new(cents, 2), CurrencyCode::USD),
                image_path: format!("/images/{id}.jpg"),
            },
        }
    }

    fn seeded(lines: Vec<CartLine>) -> CartController {
        let mut cart = controller();
        cart.cart.reset(lines);
        cart
    }

    fn quantities(cart: &CartController) -> Vec<(i64, u32)> {
        cart.lines()
            .iter()
            .map(|l| (l.id.as_i64(), l.quantity))
            .collect()
    }

    #[test]
    fn test_staged_edit_shows_immediately_and_commits_server_cart() {
        let mut cart = seeded(vec![line(1, 2, 450), line(2, 1, 900)]);

        let edit = cart.stage_quantity(CartLineId::new(1), 5).expect("staged");
        assert_eq!(quantities(&cart), [(1, 5), (2, 1)]);

        let server = vec![line(1, 5, 450), line(2, 1, 900)];
        assert_eq!(
            cart.commit_edit(edit, Some(server)),
            Reconciliation::Committed
        );
        assert_eq!(quantities(&cart), [(1, 5), (2, 1)]);
    }

    #[test]
    fn test_failed_edit_reverts_and_posts_notice() {
        let mut cart = seeded(vec![line(1, 2, 450)]);

        let edit = cart.stage_quantity(CartLineId::new(1), 7).expect("staged");
        let error = ApiError::Api {
            status: 422,
            message: "Out of stock".to_string(),
        };
        assert_eq!(
            cart.roll_back_edit(&edit, &error),
            Reconciliation::RolledBack
        );
        assert_eq!(quantities(&cart), [(1, 2)]);
        assert!(!cart.notices().is_empty());
    }

    #[test]
    fn test_superseded_edit_failure_neither_reverts_nor_notices() {
        let mut cart = seeded(vec![line(1, 2, 450)]);

        let first = cart.stage_quantity(CartLineId::new(1), 3).expect("staged");
        let second = cart.stage_quantity(CartLineId::new(1), 6).expect("staged");
        assert_eq!(quantities(&cart), [(1, 6)]);

        // The older edit's failure arrives after a newer edit was staged.
        let error = ApiError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(cart.roll_back_edit(&first, &error), Reconciliation::Stale);
        assert_eq!(quantities(&cart), [(1, 6)]);
        assert!(cart.notices().is_empty());

        let server = vec![line(1, 6, 450)];
        assert_eq!(
            cart.commit_edit(second, Some(server)),
            Reconciliation::Committed
        );
        assert_eq!(quantities(&cart), [(1, 6)]);
    }

    #[test]
    fn test_stale_success_does_not_clobber_newer_edit() {
        let mut cart = seeded(vec![line(1, 2, 450)]);

        let first = cart.stage_quantity(CartLineId::new(1), 3).expect("staged");
        let second = cart.stage_quantity(CartLineId::new(1), 9).expect("staged");

        // The older response lands first; it must be discarded.
        assert_eq!(
            cart.commit_edit(first, Some(vec![line(1, 3, 450)])),
            Reconciliation::Stale
        );
        assert_eq!(quantities(&cart), [(1, 9)]);

        assert_eq!(
            cart.commit_edit(second, Some(vec![line(1, 9, 450)])),
            Reconciliation::Committed
        );
        assert_eq!(quantities(&cart), [(1, 9)]);
    }

    #[test]
    fn test_removal_disappears_then_reverts_on_failure() {
        let mut cart = seeded(vec![line(1, 2, 450), line(2, 1, 900)]);

        let edit = cart.stage_quantity(CartLineId::new(1), 0).expect("staged");
        assert!(edit.is_removal());
        assert_eq!(quantities(&cart), [(2, 1)]);

        let error = ApiError::Api {
            status: 500,
            message: String::new(),
        };
        cart.roll_back_edit(&edit, &error);
        assert_eq!(quantities(&cart), [(1, 2), (2, 1)]);
    }

    #[test]
    fn test_removal_commit_confirms_staged_cart() {
        let mut cart = seeded(vec![line(1, 2, 450), line(2, 1, 900)]);

        let edit = cart.stage_quantity(CartLineId::new(2), 0).expect("staged");
        assert_eq!(cart.commit_edit(edit, None), Reconciliation::Committed);
        assert_eq!(quantities(&cart), [(1, 2)]);
    }

    #[test]
    fn test_edit_for_unknown_line_stages_nothing() {
        let mut cart = seeded(vec![line(1, 2, 450)]);
        assert!(cart.stage_quantity(CartLineId::new(99), 3).is_none());
        assert_eq!(quantities(&cart), [(1, 2)]);
    }

    #[test]
    fn test_select_all_toggle_covers_exactly_displayed_lines() {
        let mut cart = seeded(vec![line(1, 2, 450), line(2, 1, 900), line(3, 4, 100)]);

        cart.toggle_select_all();
        let mut ids: Vec<i64> = cart.selected_ids().iter().map(|id| id.as_i64()).collect();
        ids.sort_unstable();
        assert_eq!(ids, [1, 2, 3]);
        assert!(cart.all_selected());

        cart.toggle_select_all();
        assert!(cart.selected_ids().is_empty());
    }

    #[test]
    fn test_committed_removal_prunes_selection() {
        let mut cart = seeded(vec![line(1, 2, 450), line(2, 1, 900)]);
        cart.toggle_selected(CartLineId::new(1));
        cart.toggle_selected(CartLineId::new(2));

        let edit = cart.stage_quantity(CartLineId::new(1), 0).expect("staged");
        cart.commit_edit(edit, None);

        let ids: Vec<i64> = cart.selected_ids().iter().map(|id| id.as_i64()).collect();
        assert_eq!(ids, [2]);
    }

    #[test]
    fn test_subtotal_and_selected_total() {
        let mut cart = seeded(vec![line(1, 2, 450), line(2, 1, 900)]);
        assert_eq!(cart.subtotal().amount, Decimal::new(1800, 2));

        cart.toggle_selected(CartLineId::new(2));
        assert_eq!(cart.selected_total().amount, Decimal::new(900, 2));
    }
}
