//! Authentication operations.

use tracing::{debug, instrument};

use wildmint_core::Email;

use crate::error::ApiError;
use crate::session::Session;
use crate::types::CurrentUser;

use super::ApiClient;

impl ApiClient {
    /// Log in with email and password.
    ///
    /// On success the returned token is written to the session store so
    /// subsequent authenticated calls pick it up. A rejected login writes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for bad credentials, or another
    /// [`ApiError`] for transport and storage failures.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<Session, ApiError> {
        #[derive(serde::Serialize)]
        struct LoginRequest<'a> {
            email: &'a Email,
            password: &'a str,
        }

        #[derive(serde::Deserialize)]
        struct LoginResponse {
            token: String,
        }

        let request = self
            .http()
            .post(self.endpoint("/login"))
            .json(&LoginRequest { email, password });
        let response: LoginResponse = self.execute_json(request).await?;

        let session = Session::new(response.token);
        self.sessions().set(&session)?;
        debug!("login succeeded");
        Ok(session)
    }

    /// Create an account. Does not log in; callers follow up with
    /// [`ApiClient::login`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the registration.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &str,
    ) -> Result<(), ApiError> {
        #[derive(serde::Serialize)]
        struct RegisterRequest<'a> {
            name: &'a str,
            email: &'a Email,
            password: &'a str,
        }

        let request = self
            .http()
            .post(self.endpoint("/register"))
            .json(&RegisterRequest {
                name,
                email,
                password,
            });
        self.execute(request).await?;
        debug!("registration succeeded");
        Ok(())
    }

    /// The user behind the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no session or the token is rejected.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        let request = self.get_authed("/current-authentication")?;
        self.execute_json(request).await
    }

    /// Log out and drop the stored session.
    ///
    /// The local session is cleared even when the server rejects the
    /// token: an already-dead token still means logged out here.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or if the session store
    /// cannot be cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let request = self.post_authed("/logout")?;
        let result = self.execute(request).await;
        self.sessions().clear()?;
        match result {
            Ok(_) | Err(ApiError::Unauthorized) => {
                debug!("logged out");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
