//! Optimistic local edits reconciled against asynchronous server responses.
//!
//! Views mutate a value locally the moment the user acts, then fire the
//! matching request. Responses may resolve out of order, so every staged
//! edit is tagged with a monotonically increasing sequence number and only
//! the response for the *newest* staged edit is allowed to settle the
//! value. Responses for superseded edits are discarded, which keeps a slow
//! early response from clobbering a fast later one.

/// Proof that an edit was staged, carried alongside its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateTicket {
    seq: u64,
}

/// Outcome of feeding a server response back into an [`OptimisticValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The response belonged to the newest staged edit and settled the value.
    Committed,
    /// The newest staged edit failed; the display reverted to the last
    /// server-confirmed value.
    RolledBack,
    /// The response belonged to a superseded edit and was discarded.
    Stale,
}

/// A value shown to the user ahead of server confirmation.
///
/// `displayed` is what the view renders; `committed` is the last value the
/// server confirmed. The two diverge while an edit is in flight and converge
/// again when the newest edit's response arrives.
#[derive(Debug, Clone)]
pub struct OptimisticValue<T> {
    committed: T,
    displayed: T,
    pending: Option<u64>,
    next_seq: u64,
}

impl<T: Clone> OptimisticValue<T> {
    /// Starts from a server-confirmed value.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            committed: value.clone(),
            displayed: value,
            pending: None,
            next_seq: 0,
        }
    }

    /// The value the view should render right now.
    #[must_use]
    pub const fn displayed(&self) -> &T {
        &self.displayed
    }

    /// The last server-confirmed value.
    #[must_use]
    pub const fn committed(&self) -> &T {
        &self.committed
    }

    /// Whether an edit is awaiting its server response.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Shows `value` immediately and returns the ticket to resolve it with.
    ///
    /// Staging again before the previous edit resolves supersedes it: the
    /// older ticket will reconcile as [`Reconciliation::Stale`].
    pub fn stage(&mut self, value: T) -> UpdateTicket {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.displayed = value;
        self.pending = Some(seq);
        UpdateTicket { seq }
    }

    /// Settles a successful response carrying the server's view of the value.
    pub fn acknowledge(&mut self, ticket: UpdateTicket, server_value: T) -> Reconciliation {
        if self.pending != Some(ticket.seq) {
            return Reconciliation::Stale;
        }
        self.committed = server_value.clone();
        self.displayed = server_value;
        self.pending = None;
        Reconciliation::Committed
    }

    /// Settles a failed response by reverting to the last confirmed value.
    pub fn reject(&mut self, ticket: UpdateTicket) -> Reconciliation {
        if self.pending != Some(ticket.seq) {
            return Reconciliation::Stale;
        }
        self.displayed = self.committed.clone();
        self.pending = None;
        Reconciliation::RolledBack
    }

    /// Replaces both values with a fresh server read, superseding any
    /// in-flight edit.
    pub fn reset(&mut self, value: T) {
        self.committed = value.clone();
        self.displayed = value;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledge_commits_server_value() {
        let mut value = OptimisticValue::new(1);
        let ticket = value.stage(2);
        assert_eq!(*value.displayed(), 2);
        assert_eq!(*value.committed(), 1);

        assert_eq!(value.acknowledge(ticket, 2), Reconciliation::Committed);
        assert_eq!(*value.displayed(), 2);
        assert_eq!(*value.committed(), 2);
        assert!(!value.is_pending());
    }

    #[test]
    fn test_reject_reverts_to_committed() {
        let mut value = OptimisticValue::new(5);
        let ticket = value.stage(9);
        assert_eq!(value.reject(ticket), Reconciliation::RolledBack);
        assert_eq!(*value.displayed(), 5);
        assert!(!value.is_pending());
    }

    #[test]
    fn test_superseded_response_is_discarded() {
        let mut value = OptimisticValue::new(1);
        let first = value.stage(2);
        let second = value.stage(3);

        // The older response lands first and must not disturb the display.
        assert_eq!(value.acknowledge(first, 2), Reconciliation::Stale);
        assert_eq!(*value.displayed(), 3);
        assert!(value.is_pending());

        assert_eq!(value.acknowledge(second, 3), Reconciliation::Committed);
        assert_eq!(*value.committed(), 3);
    }

    #[test]
    fn test_late_response_after_settlement_is_stale() {
        let mut value = OptimisticValue::new(1);
        let first = value.stage(2);
        let second = value.stage(3);
        assert_eq!(value.acknowledge(second, 3), Reconciliation::Committed);

        // Both success and failure of the stale edit are no-ops.
        assert_eq!(value.acknowledge(first, 2), Reconciliation::Stale);
        assert_eq!(value.reject(first), Reconciliation::Stale);
        assert_eq!(*value.displayed(), 3);
    }

    #[test]
    fn test_stale_rejection_does_not_revert_newer_edit() {
        let mut value = OptimisticValue::new(1);
        let first = value.stage(2);
        let _second = value.stage(3);

        assert_eq!(value.reject(first), Reconciliation::Stale);
        assert_eq!(*value.displayed(), 3);
        assert!(value.is_pending());
    }

    #[test]
    fn test_reset_supersedes_in_flight_edit() {
        let mut value = OptimisticValue::new(1);
        let ticket = value.stage(2);
        value.reset(7);
        assert_eq!(*value.displayed(), 7);
        assert_eq!(*value.committed(), 7);
        assert_eq!(value.acknowledge(ticket, 2), Reconciliation::Stale);
        assert_eq!(*value.displayed(), 7);
    }
}
