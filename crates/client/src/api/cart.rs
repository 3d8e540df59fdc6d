//! Cart operations.
//!
//! Every mutation returns the server's updated view of the whole cart so
//! the caller can reconcile in one step.

use tracing::instrument;

use wildmint_core::{CartLineId, ProductId};

use crate::error::ApiError;
use crate::response::parse_list;
use crate::types::CartLine;

use super::ApiClient;

impl ApiClient {
    /// Fetch the full cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not a
    /// listing.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<Vec<CartLine>, ApiError> {
        let request = self.get_authed("/cart")?;
        let raw: serde_json::Value = self.execute_json(request).await?;
        parse_list(raw)
    }

    /// Add a product to the cart, returning the updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the addition.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, ApiError> {
        #[derive(serde::Serialize)]
        struct AddToCartRequest {
            product_id: ProductId,
            quantity: u32,
        }

        let request = self.post_authed("/cart")?.json(&AddToCartRequest {
            product_id,
            quantity,
        });
        let raw: serde_json::Value = self.execute_json(request).await?;
        parse_list(raw)
    }

    /// Set a line's quantity, returning the updated cart.
    ///
    /// Sends the value as given; mapping quantity zero to a delete is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update.
    #[instrument(skip(self))]
    pub async fn update_cart_quantity(
        &self,
        line_id: CartLineId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, ApiError> {
        #[derive(serde::Serialize)]
        struct UpdateQuantityRequest {
            quantity: u32,
        }

        let request = self
            .put_authed(&format!("/cart/{line_id}"))?
            .json(&UpdateQuantityRequest { quantity });
        let raw: serde_json::Value = self.execute_json(request).await?;
        parse_list(raw)
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the request fails.
    #[instrument(skip(self))]
    pub async fn delete_cart_line(&self, line_id: CartLineId) -> Result<(), ApiError> {
        let request = self.delete_authed(&format!("/cart/{line_id}"))?;
        self.execute(request).await?;
        Ok(())
    }
}
