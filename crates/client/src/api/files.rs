//! File download and Stripe checkout-url endpoints.

use tracing::instrument;

use crate::error::ApiError;

use super::ApiClient;

impl ApiClient {
    /// Download a server-hosted file (product and profile images).
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or the request fails.
    #[instrument(skip(self))]
    pub async fn download_file(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let request = self
            .get_authed("/download/file")?
            .query(&[("path", path)]);
        let response = self.execute(request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Resolve the hosted checkout URL for a Stripe session.
    ///
    /// Used when the buyer returns from an interrupted checkout and needs
    /// to be sent back to the same payment page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or the request fails.
    #[instrument(skip(self))]
    pub async fn stripe_checkout_url(&self, session_id: &str) -> Result<String, ApiError> {
        #[derive(serde::Deserialize)]
        struct CheckoutUrlResponse {
            url: String,
        }

        let request = self
            .get_authed("/stripe/checkout-url")?
            .query(&[("session_id", session_id)]);
        let response: CheckoutUrlResponse = self.execute_json(request).await?;
        Ok(response.url)
    }
}
