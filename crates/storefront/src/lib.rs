//! Wildmint Storefront - buyer-facing view-state.
//!
//! Controllers for the shop's buyer surfaces: catalog browsing, the cart
//! with optimistic edits, checkout, order history, and the sign-in
//! flows. Each controller owns its slice of view-state, talks to the API
//! through [`wildmint_client::ApiClient`], and reports failures as
//! auto-dismissing notices rather than propagating errors to the
//! embedding presentation layer.
//!
//! # Modules
//!
//! - [`auth`] - login, registration, session lifecycle
//! - [`cart`] - optimistic cart edits with out-of-order reconciliation
//! - [`catalog`] - filtered, paginated product browsing
//! - [`checkout`] - order placement for COD and hosted Stripe checkout
//! - [`orders`] - the buyer's order history with client-side tabs
//! - [`poll`] - the cancellable cart-badge poller

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod poll;

pub use auth::{AuthController, CredentialError, RegistrationForm};
pub use cart::{CartController, PendingEdit};
pub use catalog::CatalogController;
pub use checkout::{CheckoutController, CheckoutForm, CheckoutFormError};
pub use orders::OrderHistory;
pub use poll::{CartBadgePoller, DEFAULT_POLL_PERIOD};
