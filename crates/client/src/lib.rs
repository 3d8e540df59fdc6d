//! HTTP adapter for the Wildmint REST API.
//!
//! This crate is the only place that talks to the network. It owns:
//!
//! - [`ApiClient`] - a clone-cheap REST client that attaches the bearer
//!   token from an injected [`SessionStore`] and maps HTTP failures to
//!   [`ApiError`]
//! - the wire types both surfaces share ([`types`])
//! - strict listing-payload parsing ([`response`]), so malformed server
//!   responses surface as errors instead of silently empty lists
//!
//! The storefront and admin crates build their view state on top of this;
//! nothing here holds UI state or retries anything.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod response;
pub mod session;
pub mod types;

pub use api::ApiClient;
pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use response::{Page, parse_list, parse_page};
pub use session::{FileSessionStore, InMemorySessionStore, Session, SessionError, SessionStore};
pub use types::*;
