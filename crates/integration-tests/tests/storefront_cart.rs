//! Integration tests for the storefront cart against the stub shop.
//!
//! The colocated unit tests cover out-of-order reconciliation on staged
//! edits; these drive the full async round trip: stage, HTTP call,
//! settle, and the server-side cart the stub holds.

use std::time::Duration;

use wildmint_storefront::cart::CartController;
use wildmint_storefront::poll::CartBadgePoller;

use wildmint_integration_tests::StubShop;

async fn cart_with_lines(shop: &StubShop, quantities: &[u32]) -> CartController {
    let api = shop.buyer_client().await;
    let mut cart = CartController::new(api);
    let products: Vec<_> = shop.catalog_ids();
    for (product_id, quantity) in products.into_iter().zip(quantities.iter().copied()) {
        cart.add_product(product_id, quantity).await;
    }
    cart
}

// =============================================================================
// Fetch and add
// =============================================================================

#[tokio::test]
async fn test_add_product_round_trips_through_the_server() {
    let shop = StubShop::spawn_seeded().await;
    let cart = cart_with_lines(&shop, &[2]).await;

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 2);
    assert_eq!(shop.cart_lines().len(), 1, "server holds the same line");
    assert!(!cart.notices().is_empty(), "added-to-cart notice posted");
}

#[tokio::test]
async fn test_refresh_overwrites_local_state() {
    let shop = StubShop::spawn_seeded().await;
    let mut cart = cart_with_lines(&shop, &[2]).await;

    // Another session empties the cart behind our back.
    let other = shop.buyer_client().await;
    let line_id = shop.cart_lines()[0].id;
    other.delete_cart_line(line_id).await.expect("other session delete");

    cart.refresh().await;
    assert!(cart.is_empty(), "last read wins");
}

// =============================================================================
// Quantity edits
// =============================================================================

#[tokio::test]
async fn test_quantity_edit_settles_at_server_value() {
    let shop = StubShop::spawn_seeded().await;
    let mut cart = cart_with_lines(&shop, &[2]).await;
    let line_id = cart.lines()[0].id;

    cart.change_quantity(line_id, 5).await;
    assert_eq!(cart.lines()[0].quantity, 5);
    assert_eq!(shop.cart_lines()[0].quantity, 5);
}

#[tokio::test]
async fn test_rejected_edit_reverts_display_and_posts_notice() {
    let shop = StubShop::spawn_seeded().await;
    let mut cart = cart_with_lines(&shop, &[2]).await;
    let line_id = cart.lines()[0].id;

    shop.fail_once("PUT /cart/{id}", 422, "Only 2 left in stock.");
    cart.change_quantity(line_id, 50).await;

    assert_eq!(cart.lines()[0].quantity, 2, "display reverted");
    assert_eq!(shop.cart_lines()[0].quantity, 2, "server untouched");
    assert!(!cart.notices().is_empty());
}

// =============================================================================
// Removal (quantity zero)
// =============================================================================

#[tokio::test]
async fn test_zero_quantity_removes_the_line_everywhere() {
    let shop = StubShop::spawn_seeded().await;
    let mut cart = cart_with_lines(&shop, &[2, 1]).await;
    let line_id = cart.lines()[0].id;

    cart.change_quantity(line_id, 0).await;
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(shop.cart_lines().len(), 1);
    assert!(cart.line(line_id).is_none());
    assert_eq!(shop.hits("DELETE /cart/{id}"), 1, "mapped to a delete call");
    assert_eq!(shop.hits("PUT /cart/{id}"), 0);
}

#[tokio::test]
async fn test_failed_removal_keeps_the_line() {
    let shop = StubShop::spawn_seeded().await;
    let mut cart = cart_with_lines(&shop, &[2]).await;
    let line_id = cart.lines()[0].id;

    shop.fail_once("DELETE /cart/{id}", 500, "Try again.");
    cart.remove_line(line_id).await;

    assert_eq!(cart.lines().len(), 1, "line restored after failure");
    assert_eq!(shop.cart_lines().len(), 1);
}

// =============================================================================
// Selection and bulk removal
// =============================================================================

#[tokio::test]
async fn test_bulk_remove_deletes_selected_lines_then_rereads() {
    let shop = StubShop::spawn_seeded().await;
    let mut cart = cart_with_lines(&shop, &[1, 2, 3]).await;
    let keep = cart.lines()[2].id;
    let drop_a = cart.lines()[0].id;
    let drop_b = cart.lines()[1].id;

    cart.toggle_selected(drop_a);
    cart.toggle_selected(drop_b);
    cart.remove_selected().await;

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].id, keep);
    assert!(cart.selected_ids().is_empty(), "selection pruned");
    assert_eq!(shop.cart_lines().len(), 1);
}

// =============================================================================
// Badge poller
// =============================================================================

#[tokio::test]
async fn test_badge_poller_publishes_totals_and_stops_cleanly() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.buyer_client().await;
    let mut cart = CartController::new(api.clone());
    cart.add_product(shop.catalog_ids()[0], 2).await;
    cart.add_product(shop.catalog_ids()[1], 1).await;

    let poller = CartBadgePoller::spawn(api, Duration::from_millis(20));
    let mut counts = poller.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            counts.changed().await.expect("poller alive");
            if *counts.borrow() == 3 {
                break;
            }
        }
    })
    .await
    .expect("poller publishes the cart total");

    poller.stop().await;
    let polls_after_stop = shop.hits("GET /cart");
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(
        shop.hits("GET /cart"),
        polls_after_stop,
        "no polls after stop"
    );
}

#[tokio::test]
async fn test_badge_poller_reports_zero_when_signed_out() {
    let shop = StubShop::spawn_seeded().await;
    let api = shop.client();

    let poller = CartBadgePoller::spawn(api, Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(poller.count(), 0);
    poller.stop().await;
}
