//! Wildmint Core - Shared types and view-state primitives.
//!
//! This crate provides the common vocabulary used across the Wildmint
//! components:
//! - `client` - REST gateway adapter for the commerce API
//! - `storefront` - Buyer-facing view-state (cart, catalog, orders)
//! - `admin` - Back-office view-state (order board, products, analytics)
//!
//! # Architecture
//!
//! The core crate contains only types and pure state machinery - no I/O, no
//! HTTP, no storage access. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and the
//!   order status vocabulary with its per-payment-method transition tables
//! - [`optimistic`] - Per-entity reconciliation guard for optimistic updates
//! - [`notice`] - Transient, auto-dismissing user-facing messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod notice;
pub mod optimistic;
pub mod types;

pub use notice::{Notice, NoticeCenter, NoticeId, NoticeLevel};
pub use optimistic::{OptimisticValue, Reconciliation, UpdateTicket};
pub use types::*;
