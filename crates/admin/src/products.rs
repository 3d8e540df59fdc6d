//! Product administration: list, create, delete.
//!
//! Creation goes out as a multipart request with the optional image
//! bytes attached; the form is validated locally first, including the
//! price string the admin typed.

use rust_decimal::Decimal;
use tracing::{info, warn};

use wildmint_client::{ApiClient, ImageUpload, NewProduct, Product, ProductFilter};
use wildmint_core::{CurrencyCode, Money, NoticeCenter, ProductId};

/// Local checks on the product form, run before any request.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProductFormError {
    #[error("product name is required")]
    EmptyName,
    #[error("brand is required")]
    EmptyBrand,
    #[error("category is required")]
    EmptyCategory,
    #[error("price must be a positive amount")]
    InvalidPrice,
}

/// Values of the product form as typed. The price stays a string until
/// validation parses it.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: String,
    pub featured: bool,
}

impl ProductForm {
    /// Checks the form and returns the parsed price.
    ///
    /// # Errors
    ///
    /// Returns the first failed check; the price must parse as a decimal
    /// greater than zero.
    pub fn validate(&self) -> Result<Money, ProductFormError> {
        if self.name.trim().is_empty() {
            return Err(ProductFormError::EmptyName);
        }
        if self.brand.trim().is_empty() {
            return Err(ProductFormError::EmptyBrand);
        }
        if self.category.trim().is_empty() {
            return Err(ProductFormError::EmptyCategory);
        }
        let amount: Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| ProductFormError::InvalidPrice)?;
        if amount <= Decimal::ZERO {
            return Err(ProductFormError::InvalidPrice);
        }
        Ok(Money::new(amount, CurrencyCode::default()))
    }
}

/// Product catalog management state for the admin panel.
pub struct ProductAdmin {
    api: ApiClient,
    filter: ProductFilter,
    products: Vec<Product>,
    total_pages: u32,
    loading: bool,
    notices: NoticeCenter,
}

impl ProductAdmin {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            filter: ProductFilter {
                page: Some(1),
                ..ProductFilter::default()
            },
            products: Vec::new(),
            total_pages: 1,
            loading: false,
            notices: NoticeCenter::default(),
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.filter.page.unwrap_or(1)
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

    /// Fetches the page the current filter describes.
    pub async fn refresh(&mut self) {
        self.loading = true;
        match self.api.list_products(&self.filter).await {
            Ok(page) => {
                self.products = page.items;
                self.total_pages = page.total_pages.max(1);
            }
            Err(e) => {
                warn!(error = %e, "product list fetch failed, showing empty page");
                self.products = Vec::new();
                self.total_pages = 1;
                self.notices.error(e.user_message());
            }
        }
        self.loading = false;
    }

    pub async fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.filter.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self.filter.page = Some(1);
        self.refresh().await;
    }

    pub async fn go_to_page(&mut self, page: u32) {
        let page = page.clamp(1, self.total_pages.max(1));
        if page == self.page() {
            return;
        }
        self.filter.page = Some(page);
        self.refresh().await;
    }

    pub async fn next_page(&mut self) {
        self.go_to_page(self.page().saturating_add(1)).await;
    }

    pub async fn previous_page(&mut self) {
        self.go_to_page(self.page().saturating_sub(1)).await;
    }

    /// Creates a product from the form, attaching the image when one was
    /// picked. Returns `true` and reloads the list on success.
    pub async fn create(&mut self, form: &ProductForm, image: Option<ImageUpload>) -> bool {
        let price = match form.validate() {
            Ok(price) => price,
            Err(e) => {
                self.notices.error(e.to_string());
                return false;
            }
        };
        let new_product = NewProduct {
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            brand: form.brand.trim().to_string(),
            category: form.category.trim().to_string(),
            price,
            featured: form.featured,
            image,
        };
        match self.api.create_product(new_product).await {
            Ok(product) => {
                info!(product_id = %product.id, "product created");
                self.notices.success("Product created.");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.notices.error(e.user_message());
                false
            }
        }
    }

    /// Deletes a product and reloads the list.
    pub async fn delete(&mut self, product_id: ProductId) -> bool {
        match self.api.delete_product(product_id).await {
            Ok(()) => {
                self.notices.success("Product deleted.");
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!(product_id = %product_id, error = %e, "product delete failed");
                self.notices.error(e.user_message());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wildmint_client::{ApiConfig, InMemorySessionStore};

    use super::*;

    fn admin() -> ProductAdmin {
        let config = ApiConfig::for_base_url("http://127.0.0.1:1".parse().expect("valid url"));
        let api = ApiClient::new(&config, Arc::new(InMemorySessionStore::new())).expect("client");
        ProductAdmin::new(api)
    }

    fn form() -> ProductForm {
        ProductForm {
            name: "Mint Tea".to_string(),
            description: "Loose leaf".to_string(),
            brand: "Wildmint".to_string(),
            category: "Tea".to_string(),
            price: "4.50".to_string(),
            featured: false,
        }
    }

    #[test]
    fn test_form_price_must_be_a_positive_decimal() {
        let mut bad = form();
        bad.price = "abc".to_string();
        assert_eq!(bad.validate(), Err(ProductFormError::InvalidPrice));

        bad.price = "-1".to_string();
        assert_eq!(bad.validate(), Err(ProductFormError::InvalidPrice));

        bad.price = "0".to_string();
        assert_eq!(bad.validate(), Err(ProductFormError::InvalidPrice));

        let money = form().validate().expect("valid form");
        assert_eq!(money.amount, Decimal::new(450, 2));
    }

    #[test]
    fn test_form_requires_name_brand_category() {
        let mut bad = form();
        bad.name = " ".to_string();
        assert_eq!(bad.validate(), Err(ProductFormError::EmptyName));

        let mut bad = form();
        bad.brand.clear();
        assert_eq!(bad.validate(), Err(ProductFormError::EmptyBrand));

        let mut bad = form();
        bad.category.clear();
        assert_eq!(bad.validate(), Err(ProductFormError::EmptyCategory));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_the_network() {
        // The unroutable port would fail differently; validation fails first.
        let mut admin = admin();
        let mut bad = form();
        bad.price = "free".to_string();

        assert!(!admin.create(&bad, None).await);
        assert!(!admin.notices().is_empty());
    }
}
