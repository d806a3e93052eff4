//! Authentication service.
//!
//! Wraps the login and register endpoints around the [`SessionStore`]:
//! input is validated locally before any request is made, and a successful
//! response starts the session.

mod error;

pub use error::AuthError;

use mlk_shop_core::Email;

use crate::api::ApiClient;
use crate::error::ValidationError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::stores::SessionStore;

/// Authentication service.
#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
    session: SessionStore,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Log in with username and password.
    ///
    /// On failure the session is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if either field is empty, without
    /// contacting the server. Returns `AuthError::Api` with the server's
    /// message if the credentials are rejected.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        require(username, "username")?;
        require(password, "password")?;

        let response = self
            .api
            .login(&LoginRequest { username, password })
            .await?;
        Ok(self.start_session(response))
    }

    /// Create an account and log in as it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for a missing field, an invalid email,
    /// or a password mismatch, without contacting the server. Returns
    /// `AuthError::Api` if the server rejects the registration.
    pub async fn register(&self, mut request: RegisterRequest) -> Result<User, AuthError> {
        request.username = request.username.trim().to_string();
        require(&request.username, "username")?;
        require(&request.email, "email")?;
        require(&request.password, "password")?;
        require(&request.confirm_password, "password confirmation")?;

        let email = Email::parse(&request.email).map_err(ValidationError::from)?;
        if request.password != request.confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }
        request.email = String::from(email);

        let response = self.api.register(&request).await?;
        Ok(self.start_session(response))
    }

    /// End the session. Never fails.
    pub fn logout(&self) {
        self.session.clear();
    }

    fn start_session(&self, response: AuthResponse) -> User {
        let (user, token) = response.into_parts();
        self.session.sign_in(user.clone(), token);
        user
    }
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use url::Url;

    use super::*;
    use crate::middleware::AuthInterceptor;
    use crate::routes::Navigator;
    use crate::storage::MemoryStore;

    /// A service whose API points at a closed port. Any request fails.
    fn offline() -> (AuthService, SessionStore) {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        let interceptor = AuthInterceptor::new(session.clone(), Navigator::new(session.clone()));
        let api = ApiClient::new(
            Url::parse("http://127.0.0.1:9/api").unwrap(),
            Duration::from_secs(1),
            interceptor,
        )
        .unwrap();
        (AuthService::new(api, session.clone()), session)
    }

    fn registration(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let (auth, session) = offline();
        let err = auth.login("", "secret").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::Required("username"))
        ));
        let err = auth.login("bob", "").await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::Required("password"))
        ));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_mismatch_rejected_locally() {
        let (auth, _) = offline();
        let err = auth.register(registration("a", "b")).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::PasswordMismatch)
        ));
    }

    #[tokio::test]
    async fn test_register_invalid_email_rejected_locally() {
        let (auth, _) = offline();
        let mut request = registration("a", "a");
        request.email = "not-an-email".to_string();
        let err = auth.register(request).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_network_failure_leaves_session_unchanged() {
        let (auth, session) = offline();
        let err = auth.login("bob", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::Api(_)));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_logout_when_anonymous_is_fine() {
        let (auth, session) = offline();
        auth.logout();
        assert!(!session.is_authenticated());
    }
}
