//! Order status vocabulary and the per-payment-method transition tables.
//!
//! Status transitions are server-authoritative. What lives here is the
//! view-side projection: for a given payment method and current status,
//! which statuses may be *offered* to the user. The tables are declarative
//! UI constraints, not an enforced state machine - the server is free to
//! reject any requested transition.

use serde::{Deserialize, Serialize};

/// Payment method selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,
    /// Stripe hosted checkout.
    Stripe,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cod => write!(f, "cod"),
            Self::Stripe => write!(f, "stripe"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cod" => Ok(Self::Cod),
            "stripe" => Ok(Self::Stripe),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Order lifecycle status as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    AwaitingPayment,
    Paid,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Completed,
    Cancelled,
    Refund,
    NoPaymentReceived,
}

impl OrderStatus {
    /// Wire representation (`snake_case`), matching the serde rename.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AwaitingPayment => "awaiting_payment",
            Self::Paid => "paid",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refund => "refund",
            Self::NoPaymentReceived => "no_payment_received",
        }
    }

    /// Whether the status admits no further transitions in any flow.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Refund | Self::NoPaymentReceived)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transition tables
// =============================================================================

use OrderStatus::{
    AwaitingPayment, Cancelled, Completed, Confirmed, Delivered, NoPaymentReceived, Paid, Pending,
    Processing, Refund, Shipped,
};

/// Transitions offered for cash-on-delivery orders, keyed by current status.
const COD_TRANSITIONS: &[(OrderStatus, &[OrderStatus])] = &[
    (
        Pending,
        &[Confirmed, Processing, Shipped, Delivered, Completed, Cancelled],
    ),
    (
        Confirmed,
        &[Processing, Shipped, Delivered, Completed, Cancelled],
    ),
    (Processing, &[Shipped, Delivered, Completed, Cancelled]),
    (Shipped, &[Delivered, Completed, Cancelled]),
    (Delivered, &[Completed, Cancelled]),
    (Completed, &[Cancelled]),
    (Cancelled, &[]),
];

/// Transitions offered for Stripe orders, keyed by current status.
///
/// `cancelled`, `refund`, and `no_payment_received` are terminal even though
/// they sit mid-sequence in the wire ordering: a cancelled order is offered
/// nothing, it does not "progress" into a refund.
const STRIPE_TRANSITIONS: &[(OrderStatus, &[OrderStatus])] = &[
    (
        AwaitingPayment,
        &[
            Paid,
            Confirmed,
            Processing,
            Shipped,
            Delivered,
            Completed,
            Cancelled,
            Refund,
            NoPaymentReceived,
        ],
    ),
    (
        Paid,
        &[
            Confirmed,
            Processing,
            Shipped,
            Delivered,
            Completed,
            Cancelled,
            Refund,
            NoPaymentReceived,
        ],
    ),
    (
        Confirmed,
        &[
            Processing,
            Shipped,
            Delivered,
            Completed,
            Cancelled,
            Refund,
            NoPaymentReceived,
        ],
    ),
    (
        Processing,
        &[
            Shipped,
            Delivered,
            Completed,
            Cancelled,
            Refund,
            NoPaymentReceived,
        ],
    ),
    (
        Shipped,
        &[Delivered, Completed, Cancelled, Refund, NoPaymentReceived],
    ),
    (Delivered, &[Completed, Cancelled, Refund, NoPaymentReceived]),
    (Completed, &[Cancelled, Refund, NoPaymentReceived]),
    (Cancelled, &[]),
    (Refund, &[]),
    (NoPaymentReceived, &[]),
];

/// The fixed status progression for one payment method.
///
/// Wraps the transition table and answers the one question the views ask:
/// given the current status, which statuses may be offered next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFlow {
    table: &'static [(OrderStatus, &'static [OrderStatus])],
}

impl StatusFlow {
    /// The flow applicable to a payment method.
    #[must_use]
    pub const fn for_payment_method(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cod => Self {
                table: COD_TRANSITIONS,
            },
            PaymentMethod::Stripe => Self {
                table: STRIPE_TRANSITIONS,
            },
        }
    }

    /// Statuses offered strictly after `current`, in flow order.
    ///
    /// A status absent from this flow (e.g., `refund` on a COD order)
    /// offers nothing.
    #[must_use]
    pub fn offered_after(&self, current: OrderStatus) -> &'static [OrderStatus] {
        self.table
            .iter()
            .find(|(status, _)| *status == current)
            .map_or(&[], |(_, offered)| offered)
    }

    /// Every status that participates in this flow, in flow order.
    #[must_use]
    pub fn statuses(&self) -> impl Iterator<Item = OrderStatus> {
        self.table.iter().map(|(status, _)| *status)
    }
}

// =============================================================================
// Order list tabs
// =============================================================================

/// Buyer-facing order list tabs.
///
/// Tabs are pure predicates over the `status` field of already-fetched
/// orders; switching tabs re-filters the in-memory page without a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTab {
    ToPay,
    ToShip,
    ToReceive,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderTab {
    /// All tabs in display order.
    pub const ALL: [Self; 6] = [
        Self::ToPay,
        Self::ToShip,
        Self::ToReceive,
        Self::Completed,
        Self::Cancelled,
        Self::Refunded,
    ];

    /// Whether an order with `status` belongs on this tab.
    #[must_use]
    pub const fn matches(&self, status: OrderStatus) -> bool {
        match self {
            Self::ToPay => matches!(status, Pending | AwaitingPayment),
            Self::ToShip => matches!(status, Paid | Confirmed | Processing),
            Self::ToReceive => matches!(status, Shipped | Delivered),
            Self::Completed => matches!(status, OrderStatus::Completed),
            Self::Cancelled => matches!(status, OrderStatus::Cancelled | NoPaymentReceived),
            Self::Refunded => matches!(status, Refund),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ToPay => "To Pay",
            Self::ToShip => "To Ship",
            Self::ToReceive => "To Receive",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Refunded => "Refunded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cod_pending_offers_full_remainder_in_order() {
        let flow = StatusFlow::for_payment_method(PaymentMethod::Cod);
        assert_eq!(
            flow.offered_after(Pending),
            &[Confirmed, Processing, Shipped, Delivered, Completed, Cancelled]
        );
    }

    #[test]
    fn test_cancelled_is_terminal_in_both_flows() {
        for method in [PaymentMethod::Cod, PaymentMethod::Stripe] {
            let flow = StatusFlow::for_payment_method(method);
            assert!(flow.offered_after(Cancelled).is_empty(), "{method}");
        }
    }

    #[test]
    fn test_stripe_refund_and_no_payment_are_terminal() {
        let flow = StatusFlow::for_payment_method(PaymentMethod::Stripe);
        assert!(flow.offered_after(Refund).is_empty());
        assert!(flow.offered_after(NoPaymentReceived).is_empty());
    }

    #[test]
    fn test_status_outside_flow_offers_nothing() {
        let flow = StatusFlow::for_payment_method(PaymentMethod::Cod);
        assert!(flow.offered_after(AwaitingPayment).is_empty());
        assert!(flow.offered_after(Refund).is_empty());
    }

    #[test]
    fn test_stripe_shipped_offers_later_statuses() {
        let flow = StatusFlow::for_payment_method(PaymentMethod::Stripe);
        assert_eq!(
            flow.offered_after(Shipped),
            &[Delivered, Completed, Cancelled, Refund, NoPaymentReceived]
        );
    }

    #[test]
    fn test_offered_statuses_never_include_current() {
        for method in [PaymentMethod::Cod, PaymentMethod::Stripe] {
            let flow = StatusFlow::for_payment_method(method);
            for status in flow.statuses() {
                assert!(
                    !flow.offered_after(status).contains(&status),
                    "{method}/{status} offers itself"
                );
            }
        }
    }

    #[test]
    fn test_each_tab_claims_disjoint_statuses() {
        let all_statuses = [
            Pending,
            AwaitingPayment,
            Paid,
            Confirmed,
            Processing,
            Shipped,
            Delivered,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            Refund,
            NoPaymentReceived,
        ];
        for status in all_statuses {
            let claiming: Vec<_> = OrderTab::ALL
                .iter()
                .filter(|tab| tab.matches(status))
                .collect();
            assert_eq!(claiming.len(), 1, "{status} claimed by {claiming:?}");
        }
    }

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&NoPaymentReceived).expect("serialize"),
            r#""no_payment_received""#
        );
        let status: OrderStatus =
            serde_json::from_str(r#""awaiting_payment""#).expect("deserialize");
        assert_eq!(status, AwaitingPayment);
    }

    #[test]
    fn test_payment_method_roundtrip() {
        assert_eq!(PaymentMethod::Cod.to_string(), "cod");
        assert_eq!(
            "stripe".parse::<PaymentMethod>().expect("valid"),
            PaymentMethod::Stripe
        );
        assert!("paypal".parse::<PaymentMethod>().is_err());
    }
}
