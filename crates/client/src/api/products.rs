//! Catalog operations.
//!
//! Listing is public; creation and deletion require an admin session.

use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument};

use wildmint_core::ProductId;

use crate::error::ApiError;
use crate::response::{Page, parse_page};
use crate::types::{NewProduct, Product, ProductFilter};

use super::ApiClient;

impl ApiClient {
    /// List products matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not a
    /// paginated listing.
    #[instrument(skip(self, filter), fields(page = filter.page))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Page<Product>, ApiError> {
        let request = self
            .http()
            .get(self.endpoint("/products"))
            .query(&filter.query_pairs());
        let raw: serde_json::Value = self.execute_json(request).await?;
        parse_page(raw)
    }

    /// Create a product, uploading its image as a multipart file part.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the product or the image part
    /// cannot be built.
    #[instrument(skip(self, new_product), fields(name = %new_product.name))]
    pub async fn create_product(&self, new_product: NewProduct) -> Result<Product, ApiError> {
        let mut form = Form::new()
            .text("name", new_product.name)
            .text("description", new_product.description)
            .text("brand", new_product.brand)
            .text("category", new_product.category)
            .text("price", new_product.price.amount.to_string())
            .text("featured", new_product.featured.to_string());

        if let Some(image) = new_product.image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }

        let request = self.post_authed("/products")?.multipart(form);
        let product: Product = self.execute_json(request).await?;
        debug!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request
    /// fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: ProductId) -> Result<(), ApiError> {
        let request = self.delete_authed(&format!("/products/{product_id}"))?;
        self.execute(request).await?;
        Ok(())
    }
}
