//! Order operations.

use tracing::{debug, instrument};

use wildmint_core::{OrderId, OrderStatus};

use crate::error::ApiError;
use crate::response::{Page, parse_page};
use crate::types::{Order, OrderDraft, OrderListQuery, PlacedOrder};

use super::ApiClient;

impl ApiClient {
    /// List orders matching the query. Buyers see their own orders; admin
    /// tokens see everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not a
    /// paginated listing.
    #[instrument(skip(self, query), fields(page = query.page))]
    pub async fn list_orders(&self, query: &OrderListQuery) -> Result<Page<Order>, ApiError> {
        let request = self.get_authed("/orders")?.query(&query.query_pairs());
        let raw: serde_json::Value = self.execute_json(request).await?;
        parse_page(raw)
    }

    /// Place an order from the draft.
    ///
    /// COD orders come back created; Stripe orders come back as a hosted
    /// checkout URL the buyer must be redirected to.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the draft or the response
    /// matches neither shape.
    #[instrument(skip(self, draft), fields(payment_method = %draft.payment_method))]
    pub async fn place_order(&self, draft: &OrderDraft) -> Result<PlacedOrder, ApiError> {
        #[derive(serde::Deserialize)]
        struct CheckoutRedirect {
            checkout_url: String,
        }

        let request = self.post_authed("/orders")?.json(draft);
        let raw: serde_json::Value = self.execute_json(request).await?;

        if raw.get("checkout_url").is_some() {
            let redirect: CheckoutRedirect = serde_json::from_value(raw)?;
            debug!("checkout redirect issued");
            return Ok(PlacedOrder::RedirectToCheckout(redirect.checkout_url));
        }

        let order: Order = serde_json::from_value(raw)?;
        debug!(order_id = %order.id, "order created");
        Ok(PlacedOrder::Confirmed(order))
    }

    /// Request a status transition for an order.
    ///
    /// The flow tables constrain what the UI offers, but the server is
    /// free to reject any requested transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the transition.
    #[instrument(skip(self))]
    pub async fn change_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        #[derive(serde::Serialize)]
        struct ChangeStatusRequest {
            status: OrderStatus,
        }

        let request = self
            .post_authed(&format!("/orders/status/{order_id}"))?
            .json(&ChangeStatusRequest { status });
        self.execute(request).await?;
        Ok(())
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be cancelled.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<(), ApiError> {
        #[derive(serde::Serialize)]
        struct CancelRequest {
            order_id: OrderId,
        }

        let request = self
            .post_authed("/orders/cancel")?
            .json(&CancelRequest { order_id });
        self.execute(request).await?;
        Ok(())
    }
}
