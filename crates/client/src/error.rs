//! Error types for the API gateway adapter.

use thiserror::Error;

use crate::session::SessionError;

/// Errors that can occur when talking to the Wildmint API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the request with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The bearer token was missing or rejected (401). The stored session
    /// has already been cleared by the time this surfaces.
    #[error("not authenticated")]
    Unauthorized,

    /// An authenticated endpoint was called with no stored session.
    #[error("no active session")]
    NoSession,

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed as JSON but did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),

    /// Session storage failed.
    #[error("session storage error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Short message suitable for showing to the user.
    ///
    /// Transport and shape details stay in the logs; the user sees a
    /// stable phrase per failure class.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => "Could not reach the server. Please try again.".to_string(),
            Self::Unauthorized | Self::NoSession => "Please log in to continue.".to_string(),
            Self::NotFound(_) => "The requested item could not be found.".to_string(),
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Api { status, .. } => format!("The server rejected the request ({status})."),
            Self::Parse(_) | Self::UnexpectedResponse(_) => {
                "The server sent an unexpected response.".to_string()
            }
            Self::Session(_) => "Could not access the saved session.".to_string(),
        }
    }

    /// Whether this failure means the user needs to authenticate again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::NoSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 422,
            message: "quantity must be positive".to_string(),
        };
        assert_eq!(err.to_string(), "API error (422): quantity must be positive");
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ApiError::Api {
            status: 422,
            message: "Out of stock".to_string(),
        };
        assert_eq!(err.user_message(), "Out of stock");

        let blank = ApiError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(blank.user_message(), "The server rejected the request (500).");
    }

    #[test]
    fn test_requires_login() {
        assert!(ApiError::Unauthorized.requires_login());
        assert!(ApiError::NoSession.requires_login());
        assert!(!ApiError::NotFound("x".to_string()).requires_login());
    }
}
