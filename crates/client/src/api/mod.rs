//! Wildmint REST API client.
//!
//! One client serves both the storefront and the admin. It attaches the
//! bearer token from the injected [`SessionStore`] on every authenticated
//! call and translates HTTP failures into [`ApiError`]. No retries, no
//! backoff, no response caching: the server owns all business logic and
//! the views re-fetch when they need fresh state.
//!
//! Per-domain calls live in the submodules as `impl ApiClient` blocks.

mod analytics;
mod auth;
mod cart;
mod files;
mod orders;
mod products;

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Client for the Wildmint REST API.
///
/// Cheap to clone; all clones share one connection pool and one session
/// store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    sessions: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client over the given session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig, sessions: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                sessions,
            }),
        })
    }

    /// The session store this client reads tokens from.
    #[must_use]
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.inner.sessions
    }

    /// Whether a session token is currently stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub fn has_session(&self) -> Result<bool, ApiError> {
        Ok(self.inner.sessions.get()?.is_some())
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    /// The stored bearer token, or [`ApiError::NoSession`].
    fn bearer(&self) -> Result<SecretString, ApiError> {
        self.inner
            .sessions
            .get()?
            .map(|session| session.token().clone())
            .ok_or(ApiError::NoSession)
    }

    pub(crate) fn get_authed(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.bearer()?;
        Ok(self
            .inner
            .http
            .get(self.endpoint(path))
            .bearer_auth(token.expose_secret()))
    }

    pub(crate) fn post_authed(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.bearer()?;
        Ok(self
            .inner
            .http
            .post(self.endpoint(path))
            .bearer_auth(token.expose_secret()))
    }

    pub(crate) fn put_authed(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.bearer()?;
        Ok(self
            .inner
            .http
            .put(self.endpoint(path))
            .bearer_auth(token.expose_secret()))
    }

    pub(crate) fn delete_authed(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.bearer()?;
        Ok(self
            .inner
            .http
            .delete(self.endpoint(path))
            .bearer_auth(token.expose_secret()))
    }

    /// Sends the request and maps non-success statuses to errors.
    ///
    /// A 401 clears the stored session before surfacing
    /// [`ApiError::Unauthorized`], so the next page load lands on login
    /// instead of replaying a dead token.
    pub(crate) async fn execute(
        &self,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if let Err(error) = self.inner.sessions.clear() {
                warn!(%error, "failed to clear session after 401");
            }
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            error!(status = %status, message = %message, "API returned non-success status");
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(message));
            }
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Sends the request and parses the JSON body into `T`.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        let text = response.text().await?;
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                error!(
                    error = %e,
                    body = %text.chars().take(500).collect::<String>(),
                    "failed to parse API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }
}

/// Pulls a human-readable message out of an error body.
///
/// The API reports failures as `{"message": "..."}`; anything else comes
/// through as truncated raw text.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use crate::session::InMemorySessionStore;

    use super::*;

    fn client() -> ApiClient {
        let config = ApiConfig::for_base_url(
            "http://localhost:8000/".parse().expect("valid url"),
        );
        ApiClient::new(&config, Arc::new(InMemorySessionStore::new())).expect("client")
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = client();
        assert_eq!(client.endpoint("/cart"), "http://localhost:8000/cart");
    }

    #[test]
    fn test_authed_request_requires_session() {
        let client = client();
        assert!(matches!(
            client.get_authed("/cart"),
            Err(ApiError::NoSession)
        ));
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        assert_eq!(
            error_message(r#"{"message":"Out of stock"}"#),
            "Out of stock"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_truncated_body() {
        let long_body = "x".repeat(400);
        let message = error_message(&long_body);
        assert_eq!(message.len(), 200);
    }
}
