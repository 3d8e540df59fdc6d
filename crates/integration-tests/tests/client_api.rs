//! Integration tests for the API gateway adapter.
//!
//! These exercise the wire-level contract against the stub shop: bearer
//! token attachment, session destruction on 401, the strict listing
//! parse rules, and the smaller file and Stripe endpoints.

use std::sync::Arc;

use wildmint_client::{ApiClient, ApiError, FileSessionStore, ProductFilter, SessionStore};
use wildmint_core::Email;

use wildmint_integration_tests::{StubShop, BUYER_EMAIL, BUYER_PASSWORD};

// =============================================================================
// Sessions and bearer attachment
// =============================================================================

#[tokio::test]
async fn test_authed_call_without_session_never_leaves_the_client() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.client();

    let err = api.fetch_cart().await.expect_err("no session stored");
    assert!(matches!(err, ApiError::NoSession));
    assert_eq!(shop.hits("GET /cart"), 0, "request should not be sent");
}

#[tokio::test]
async fn test_login_attaches_bearer_to_later_calls() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.buyer_client().await;

    let cart = api.fetch_cart().await.expect("authed fetch");
    assert!(cart.is_empty());
    assert_eq!(shop.hits("GET /cart"), 1);
}

#[tokio::test]
async fn test_rejected_login_stores_no_token() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.client();
    let email = Email::parse(BUYER_EMAIL).expect("email");

    let err = api
        .login(&email, "wrong-password")
        .await
        .expect_err("bad credentials");
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(!api.has_session().expect("readable store"));
}

#[tokio::test]
async fn test_401_destroys_the_durable_session() {
    let shop = StubShop::spawn_seeded().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let store: Arc<dyn SessionStore> =
        Arc::new(FileSessionStore::new(dir.path().join("session.json")));
    let api: ApiClient = shop.client_with_store(Arc::clone(&store));

    let email = Email::parse(BUYER_EMAIL).expect("email");
    api.login(&email, BUYER_PASSWORD).await.expect("login");
    assert!(store.get().expect("read store").is_some());

    // The server revokes the token; the adapter must drop the file copy.
    shop.fail_once("GET /current-authentication", 401, "Token revoked.");
    let err = api.current_user().await.expect_err("revoked token");
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(store.get().expect("read store").is_none());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_server_rejects() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.buyer_client().await;

    shop.fail_once("POST /logout", 401, "Already logged out.");
    api.logout().await.expect("logout tolerates 401");
    assert!(!api.has_session().expect("readable store"));
}

// =============================================================================
// Error surface
// =============================================================================

#[tokio::test]
async fn test_server_message_reaches_the_error() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.buyer_client().await;

    shop.fail_once("GET /cart", 503, "Down for maintenance.");
    let err = api.fetch_cart().await.expect_err("scripted failure");
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Down for maintenance.");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_resources_map_to_not_found() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.buyer_client().await;

    let err = api
        .delete_cart_line(wildmint_core::CartLineId::new(999))
        .await
        .expect_err("no such line");
    assert!(matches!(err, ApiError::NotFound(_)));
}

// =============================================================================
// Listing parse contract
// =============================================================================

#[tokio::test]
async fn test_empty_listing_is_ok_not_an_error() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.buyer_client().await;

    let cart = api.fetch_cart().await.expect("bare empty array parses");
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_malformed_listing_is_a_distinguishable_error() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.admin_client().await;

    shop.set_analytics_malformed(true);
    let err = api
        .sales_report()
        .await
        .expect_err("object without items is not a listing");
    assert!(
        matches!(err, ApiError::UnexpectedResponse(_)),
        "got {err:?}"
    );

    shop.set_analytics_malformed(false);
    let rows = api.sales_report().await.expect("well-formed report");
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_product_listing_carries_page_count() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.client();

    // Public endpoint: no login needed.
    let page = api
        .list_products(&ProductFilter::default())
        .await
        .expect("list products");
    assert_eq!(page.items.len(), 3, "first page is full");
    assert_eq!(page.total_pages, 2, "four products at three per page");
}

// =============================================================================
// Files and Stripe
// =============================================================================

#[tokio::test]
async fn test_file_download_returns_raw_bytes() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.buyer_client().await;

    let bytes = api
        .download_file("/receipts/42.pdf")
        .await
        .expect("download");
    assert_eq!(bytes, b"file-bytes:/receipts/42.pdf");
}

#[tokio::test]
async fn test_stripe_checkout_url_lookup() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.buyer_client().await;

    let url = api
        .stripe_checkout_url("cs_test_123")
        .await
        .expect("checkout url");
    assert_eq!(url, "https://checkout.stripe.test/resume/cs_test_123");
}
