//! Listing payload parsing.
//!
//! Listing endpoints return either a bare JSON array or a paginated
//! envelope with an `items` array. Parsing is strict: a payload in
//! neither shape is an error, never a silent empty list, so callers and
//! tests can tell "server returned nothing" from "server returned
//! garbage". Views that want the defensive empty-list fallback apply it
//! themselves after logging.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// One page of a listing, with the server-reported page count.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of pages for the current filter. Endpoints that do
    /// not paginate omit it.
    #[serde(default = "single_page")]
    pub total_pages: u32,
}

const fn single_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// A page with no items.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 1,
        }
    }
}

/// Parses a listing payload into its items, accepting a bare array or an
/// `{ "items": [...] }` envelope.
///
/// # Errors
///
/// Returns [`ApiError::UnexpectedResponse`] when the payload is neither
/// shape, or [`ApiError::Parse`] when an element does not match `T`.
pub fn parse_list<T: DeserializeOwned>(raw: serde_json::Value) -> Result<Vec<T>, ApiError> {
    match raw {
        serde_json::Value::Array(_) => Ok(serde_json::from_value(raw)?),
        serde_json::Value::Object(mut object) => {
            let items = object.remove("items").ok_or_else(|| {
                ApiError::UnexpectedResponse("listing object has no `items` field".to_string())
            })?;
            if !items.is_array() {
                return Err(ApiError::UnexpectedResponse(format!(
                    "`items` is {}, expected an array",
                    json_kind(&items)
                )));
            }
            Ok(serde_json::from_value(items)?)
        }
        other => Err(ApiError::UnexpectedResponse(format!(
            "expected a listing, got {}",
            json_kind(&other)
        ))),
    }
}

/// Parses a paginated listing payload.
///
/// A bare array becomes a single page; an envelope must carry `items` and
/// may carry `total_pages`.
///
/// # Errors
///
/// Same contract as [`parse_list`].
pub fn parse_page<T: DeserializeOwned>(raw: serde_json::Value) -> Result<Page<T>, ApiError> {
    match raw {
        serde_json::Value::Array(_) => Ok(Page {
            items: serde_json::from_value(raw)?,
            total_pages: 1,
        }),
        serde_json::Value::Object(ref object) => {
            if !object.contains_key("items") {
                return Err(ApiError::UnexpectedResponse(
                    "listing object has no `items` field".to_string(),
                ));
            }
            Ok(serde_json::from_value(raw)?)
        }
        other => Err(ApiError::UnexpectedResponse(format!(
            "expected a listing, got {}",
            json_kind(&other)
        ))),
    }
}

/// Human-readable JSON type name for error messages.
const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
