//! Wildmint Admin - back-office view-state.
//!
//! Controllers for the admin panel: the order board with filtering,
//! selection, and optimistic status changes; product administration
//! with multipart image upload; and the sales analytics dashboard.
//! Like the storefront crate, everything here is presentation-free
//! view-state over [`wildmint_client::ApiClient`]; failures become
//! auto-dismissing notices, never propagated errors.
//!
//! # Modules
//!
//! - [`orders`] - the order board and its status workflow
//! - [`products`] - product list, multipart create, delete
//! - [`analytics`] - the three-report sales dashboard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod orders;
pub mod products;

pub use analytics::Dashboard;
pub use orders::{OrderBoard, PendingStatusChange};
pub use products::{ProductAdmin, ProductForm, ProductFormError};
