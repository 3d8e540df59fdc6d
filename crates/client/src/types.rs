//! Wire types shared across API operations.
//!
//! Small single-use request bodies are defined inline next to the call
//! that sends them; everything here is referenced from more than one
//! place or crosses the crate boundary into the storefront and admin.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use wildmint_core::{
    CartLineId, Email, Money, OrderId, OrderStatus, PaymentMethod, ProductId, StatusFlow, UserId,
};

// =============================================================================
// Authentication
// =============================================================================

/// The authenticated user, as reported by `GET /current-authentication`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub is_admin: bool,
}

// =============================================================================
// Cart
// =============================================================================

/// Denormalized product data carried on each cart line so the cart can
/// render without a second fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub name: String,
    pub price: Money,
    pub image_path: String,
}

/// One line of the server-side cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub product: ProductSnapshot,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Snapshot of one purchased product on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    pub image_path: String,
}

/// An order as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub full_name: String,
    pub shipping_address: String,
    pub items: Vec<OrderItem>,
    pub total: Money,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// The status flow this order progresses through.
    #[must_use]
    pub const fn flow(&self) -> StatusFlow {
        StatusFlow::for_payment_method(self.payment_method)
    }

    /// Statuses that may be offered as the next transition.
    #[must_use]
    pub fn offered_transitions(&self) -> &'static [OrderStatus] {
        self.flow().offered_after(self.status)
    }
}

/// Checkout submission for `POST /orders`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    pub full_name: String,
    pub shipping_address: String,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub cart_items: Vec<CartLine>,
    /// Where Stripe sends the buyer after payment. COD orders omit both.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

/// Result of placing an order.
///
/// COD orders are created immediately; Stripe orders come back as a
/// hosted-checkout URL the buyer must be sent to.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacedOrder {
    Confirmed(Order),
    RedirectToCheckout(String),
}

/// Server-side filters for `GET /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderListQuery {
    /// 1-based page cursor. `None` lets the server default to the first page.
    pub page: Option<u32>,
    pub status: Option<OrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl OrderListQuery {
    /// Query parameters in wire form. Unset filters are omitted entirely.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.to_string()));
        }
        pairs
    }
}

// =============================================================================
// Products
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: Money,
    pub image_path: String,
    #[serde(default)]
    pub featured: bool,
}

/// Image payload for product creation, sent as a multipart file part.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Fields for creating a product via `POST /products`.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: Money,
    pub featured: bool,
    pub image: Option<ImageUpload>,
}

/// Catalog query shape, rebuilt on every filter change and sent verbatim
/// as query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub featured: Option<bool>,
    /// 1-based page cursor. `None` lets the server default to the first page.
    pub page: Option<u32>,
}

impl ProductFilter {
    /// Query parameters in wire form. Unset filters are omitted entirely.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(brand) = &self.brand {
            pairs.push(("brand", brand.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        if let Some(featured) = self.featured {
            pairs.push(("featured", featured.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}

// =============================================================================
// Analytics
// =============================================================================

/// One row of the daily sales report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SalesReportRow {
    pub date: NaiveDate,
    pub orders: u32,
    pub revenue: Money,
}

/// Aggregate revenue figures.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RevenueStatistics {
    pub total_revenue: Money,
    pub order_count: u64,
    pub average_order_value: Money,
}

/// Per-product sales totals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductPerformanceRow {
    pub product_id: ProductId,
    pub name: String,
    pub units_sold: u64,
    pub revenue: Money,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use wildmint_core::CurrencyCode;

    use super::*;

    fn snapshot(price: Money) -> ProductSnapshot {
        ProductSnapshot {
            name: "Mint Tea".to_string(),
            price,
            image_path: "/images/mint-tea.jpg".to_string(),
        }
    }

    #[test]
    fn test_cart_line_total_scales_with_quantity() {
        let price = Money::new(Decimal::new(450, 2), CurrencyCode::USD);
        let line = CartLine {
            id: CartLineId::new(1),
            product_id: ProductId::new(10),
            quantity: 3,
            product: snapshot(price),
        };
        assert_eq!(line.line_total().amount, Decimal::new(1350, 2));
    }

    #[test]
    fn test_cart_line_deserializes_from_wire_shape() {
        let line: CartLine = serde_json::from_value(json!({
            "id": 7,
            "product_id": 42,
            "quantity": 2,
            "product": {
                "name": "Mint Tea",
                "price": { "amount": "4.50", "currency": "USD" },
                "image_path": "/images/mint-tea.jpg"
            }
        }))
        .expect("deserialize");
        assert_eq!(line.id, CartLineId::new(7));
        assert_eq!(line.quantity, 2);
        assert_eq!(line.product.price.amount, Decimal::new(450, 2));
    }

    #[test]
    fn test_order_draft_omits_urls_for_cod() {
        let draft = OrderDraft {
            full_name: "Ada Buyer".to_string(),
            shipping_address: "1 Garden Way".to_string(),
            total: Money::new(Decimal::new(900, 2), CurrencyCode::USD),
            payment_method: PaymentMethod::Cod,
            cart_items: vec![],
            success_url: None,
            cancel_url: None,
        };
        let value = serde_json::to_value(&draft).expect("serialize");
        assert!(value.get("success_url").is_none());
        assert!(value.get("cancel_url").is_none());
        assert_eq!(value["payment_method"], "cod");
    }

    #[test]
    fn test_order_list_query_serializes_set_filters_only() {
        let query = OrderListQuery {
            page: Some(2),
            status: Some(OrderStatus::Shipped),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            end_date: None,
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("status", "shipped".to_string()),
                ("start_date", "2025-03-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_product_filter_serializes_all_set_values() {
        let filter = ProductFilter {
            search: Some("tea".to_string()),
            brand: None,
            category: Some("drinks".to_string()),
            min_price: Some(Decimal::new(100, 2)),
            max_price: Some(Decimal::new(2000, 2)),
            featured: Some(true),
            page: Some(1),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("search", "tea".to_string()),
                ("category", "drinks".to_string()),
                ("min_price", "1.00".to_string()),
                ("max_price", "20.00".to_string()),
                ("featured", "true".to_string()),
                ("page", "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_offered_transitions_follow_payment_method() {
        let order = Order {
            id: OrderId::new(1),
            status: OrderStatus::Pending,
            payment_method: PaymentMethod::Cod,
            full_name: "Ada Buyer".to_string(),
            shipping_address: "1 Garden Way".to_string(),
            items: vec![],
            total: Money::new(Decimal::new(900, 2), CurrencyCode::USD),
            placed_at: Utc::now(),
        };
        assert_eq!(
            order.offered_transitions(),
            &[
                OrderStatus::Confirmed,
                OrderStatus::Processing,
                OrderStatus::Shipped,
                OrderStatus::Delivered,
                OrderStatus::Completed,
                OrderStatus::Cancelled,
            ]
        );
    }
}
