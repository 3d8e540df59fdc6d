//! Login, registration, and session lifecycle.
//!
//! Forms are validated locally before any network call; a request only
//! goes out once the inputs parse. A failed login leaves the session
//! store untouched, so no half-authenticated state can survive.

use tracing::warn;

use wildmint_client::{ApiClient, CurrentUser};
use wildmint_core::{Email, EmailError, NoticeCenter};

/// Local form-validation failures, caught before any request is made.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error("password cannot be empty")]
    EmptyPassword,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("name cannot be empty")]
    EmptyName,
}

/// Values of the registration form as typed.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegistrationForm {
    /// Checks the form and returns the parsed email address.
    ///
    /// # Errors
    ///
    /// Returns the first failed check, in display order: name, email,
    /// password, confirmation.
    pub fn validate(&self) -> Result<Email, CredentialError> {
        if self.name.trim().is_empty() {
            return Err(CredentialError::EmptyName);
        }
        let email = Email::parse(self.email.trim())?;
        if self.password.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }
        if self.password != self.password_confirmation {
            return Err(CredentialError::PasswordMismatch);
        }
        Ok(email)
    }
}

fn validate_login(email: &str, password: &str) -> Result<Email, CredentialError> {
    let email = Email::parse(email.trim())?;
    if password.is_empty() {
        return Err(CredentialError::EmptyPassword);
    }
    Ok(email)
}

/// Sign-in state for the storefront header and the account pages.
pub struct AuthController {
    api: ApiClient,
    current_user: Option<CurrentUser>,
    notices: NoticeCenter,
}

impl AuthController {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            current_user: None,
            notices: NoticeCenter::default(),
        }
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current_user.as_ref()
    }

    /// Whether a session token is stored. An unreadable store counts as
    /// signed out.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.api.has_session().unwrap_or(false)
    }

    #[must_use]
    pub const fn notices(&self) -> &NoticeCenter {
        &self.notices
    }

    pub const fn notices_mut(&mut self) -> &mut NoticeCenter {
        &mut self.notices
    }

    /// Attempts to sign in. Returns `true` on success.
    ///
    /// Validation failures and rejected credentials both surface as an
    /// error notice; neither stores a token.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        let email = match validate_login(email, password) {
            Ok(email) => email,
            Err(e) => {
                self.notices.error(e.to_string());
                return false;
            }
        };
        match self.api.login(&email, password).await {
            Ok(_session) => {
                self.load_current_user().await;
                true
            }
            Err(e) if e.requires_login() => {
                self.notices.error("Invalid email or password.");
                false
            }
            Err(e) => {
                self.notices.error(e.user_message());
                false
            }
        }
    }

    /// Creates an account. Does not sign the user in; the login form is
    /// the only place a session starts.
    pub async fn register(&mut self, form: &RegistrationForm) -> bool {
        let email = match form.validate() {
            Ok(email) => email,
            Err(e) => {
                self.notices.error(e.to_string());
                return false;
            }
        };
        match self
            .api
            .register(form.name.trim(), &email, &form.password)
            .await
        {
            Ok(()) => {
                self.notices.success("Account created. You can sign in now.");
                true
            }
            Err(e) => {
                self.notices.error(e.user_message());
                false
            }
        }
    }

    /// Loads the profile behind the stored session, if any.
    ///
    /// A rejected token clears the cached user; the adapter has already
    /// dropped the stored session by then.
    pub async fn load_current_user(&mut self) {
        if !self.is_signed_in() {
            self.current_user = None;
            return;
        }
        match self.api.current_user().await {
            Ok(user) => self.current_user = Some(user),
            Err(e) if e.requires_login() => {
                self.current_user = None;
            }
            Err(e) => {
                warn!(error = %e, "could not load current user");
                self.current_user = None;
                self.notices.error(e.user_message());
            }
        }
    }

    /// Signs out. The local token is cleared even when the server call
    /// fails.
    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "server logout failed, local session cleared anyway");
        }
        self.current_user = None;
        self.notices.info("Signed out.");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wildmint_client::{ApiConfig, InMemorySessionStore};

    use super::*;

    fn controller() -> AuthController {
        let config = ApiConfig::for_base_url("http://127.0.0.1:1".parse().expect("valid url"));
        let api = ApiClient::new(&config, Arc::new(InMemorySessionStore::new())).expect("client");
        AuthController::new(api)
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Mint Shopper".to_string(),
            email: "shopper@example.com".to_string(),
            password: "hunter2!".to_string(),
            password_confirmation: "hunter2!".to_string(),
        }
    }

    #[test]
    fn test_registration_form_validates_in_display_order() {
        let mut bad = form();
        bad.name = "  ".to_string();
        assert_eq!(bad.validate(), Err(CredentialError::EmptyName));

        let mut bad = form();
        bad.email = "not-an-email".to_string();
        assert!(matches!(bad.validate(), Err(CredentialError::Email(_))));

        let mut bad = form();
        bad.password = String::new();
        bad.password_confirmation = String::new();
        assert_eq!(bad.validate(), Err(CredentialError::EmptyPassword));

        let mut bad = form();
        bad.password_confirmation = "different".to_string();
        assert_eq!(bad.validate(), Err(CredentialError::PasswordMismatch));

        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_login_validation_trims_email() {
        assert!(validate_login("  shopper@example.com  ", "pw").is_ok());
        assert_eq!(
            validate_login("shopper@example.com", ""),
            Err(CredentialError::EmptyPassword)
        );
    }

    #[tokio::test]
    async fn test_invalid_login_input_posts_notice_and_stores_nothing() {
        let mut auth = controller();
        assert!(!auth.login("not-an-email", "pw").await);
        assert!(!auth.is_signed_in());
        assert!(!auth.notices().is_empty());
    }

    #[tokio::test]
    async fn test_empty_password_never_reaches_the_network() {
        // The bad port would error differently; validation fails first.
        let mut auth = controller();
        assert!(!auth.login("shopper@example.com", "").await);
        assert!(!auth.is_signed_in());
    }
}
