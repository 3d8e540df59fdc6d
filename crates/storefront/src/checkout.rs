//! Checkout: shipping details, payment method, order placement.
//!
//! The controller validates the form locally, builds an [`OrderDraft`]
//! from the selected cart lines, and interprets the server's answer.
//! Cash-on-delivery confirms immediately; Stripe hands back a hosted
//! checkout URL the embedder must navigate to. The Stripe return URLs
//! are fixed at construction and attached only to Stripe drafts.

use tracing::info;

use wildmint_client::{ApiClient, CartLine, Order, OrderDraft, PlacedOrder};
use wildmint_core::{NoticeCenter, PaymentMethod};

/// Local checks on the checkout form, run before any request.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckoutFormError {
    #[error("full name is required")]
    EmptyName,
    #[error("shipping address is required")]
    EmptyAddress,
    #[error("no items selected for checkout")]
    EmptyCart,
}

/// Values of the checkout form as typed.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub full_name: String,
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            shipping_address: String::new(),
            payment_method: PaymentMethod::Cod,
        }
    }
}

impl CheckoutForm {
    /// Checks the form against the lines being purchased.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn validate(&self, lines: &[CartLine]) -> Result<(), CheckoutFormError> {
        if self.full_name.trim().is_empty() {
            return Err(CheckoutFormError::EmptyName);
        }
        if self.shipping_address.trim().is_empty() {
            return Err(CheckoutFormError::EmptyAddress);
        }
        if lines.is_empty() {
            return Err(CheckoutFormError::EmptyCart);
        }
        Ok(())
    }
}

/// Order placement state for the checkout page.
pub struct CheckoutController {
    api: ApiClient,
    success_url: String,
    cancel_url: String,
    last_confirmed: Option<Order>,
    placing: bool,
    notices: NoticeCenter,
}

impl CheckoutController {
    /// `success_url` and `cancel_url` are where Stripe sends the buyer
    /// afterwards; COD orders never use them.
    #[must_use]
    pub fn new(
        api: ApiClient,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            api,
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            last_confirmed: None,
            placing: false,
            notices: NoticeCenter::default(),
        }
    }

    /// The most recently confirmed order, for the thank-you view.
    #[must_use]
    pub fn last_confirmed(&self) -> Option<&Order> {
        self.last_confirmed.as_ref()
    }

    #[must_use]
    pub const fn is_placing(&self) -> bool {
        self.placing
    }

    #[must_use]
    pub const fn notices(&self) -> &NoticeCenter {
        &self.notices
    }

    pub const fn notices_mut(&mut self) -> &mut NoticeCenter {
        &mut self.notices
    }

    /// Builds the draft a given form and cart would submit.
    fn draft(&self, form: &CheckoutForm, lines: &[CartLine]) -> OrderDraft {
        let (success_url, cancel_url) = match form.payment_method {
            PaymentMethod::Stripe => {
                (Some(self.success_url.clone()), Some(self.cancel_url.clone()))
            }
            PaymentMethod::Cod => (None, None),
        };
        OrderDraft {
            full_name: form.full_name.trim().to_string(),
            shipping_address: form.shipping_address.trim().to_string(),
            total: lines.iter().map(CartLine::line_total).sum(),
            payment_method: form.payment_method,
            cart_items: lines.to_vec(),
            success_url,
            cancel_url,
        }
    }

    /// Places an order for the given lines.
    ///
    /// Returns `None` when validation or the request fails (a notice is
    /// posted). A `RedirectToCheckout` result means the embedder must
    /// send the buyer to the returned URL to pay.
    pub async fn place_order(
        &mut self,
        form: &CheckoutForm,
        lines: &[CartLine],
    ) -> Option<PlacedOrder> {
        if let Err(e) = form.validate(lines) {
            self.notices.error(e.to_string());
            return None;
        }
        self.placing = true;
        let draft = self.draft(form, lines);
        let placed = self.api.place_order(&draft).await;
        self.placing = false;
        match placed {
            Ok(PlacedOrder::Confirmed(order)) => {
                info!(order_id = %order.id, "order confirmed");
                self.notices.success("Order placed.");
                self.last_confirmed = Some(order.clone());
                Some(PlacedOrder::Confirmed(order))
            }
            Ok(redirect @ PlacedOrder::RedirectToCheckout(_)) => Some(redirect),
            Err(e) => {
                self.notices.error(e.user_message());
                None
            }
        }
    }

    /// Looks up the hosted-checkout URL for an unpaid Stripe session so
    /// the buyer can finish paying.
    pub async fn resume_checkout(&mut self, session_id: &str) -> Option<String> {
        match self.api.stripe_checkout_url(session_id).await {
            Ok(url) => Some(url),
            Err(e) => {
                self.notices.error(e.user_message());
                None
            }
        }
    }
}
