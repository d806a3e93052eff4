//! Outbound request decoration for authentication.
//!
//! Every API request passes through [`AuthInterceptor`]: the bearer token is
//! attached when present, and a 401/403 response ends the session and sends
//! the user to the login view.

use reqwest::{RequestBuilder, StatusCode};

use crate::routes::Navigator;
use crate::stores::SessionStore;

/// Attaches credentials to requests and reacts to authorization failures.
#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    session: SessionStore,
    navigator: Navigator,
}

impl AuthInterceptor {
    /// Create an interceptor bound to the application's session and navigator.
    #[must_use]
    pub const fn new(session: SessionStore, navigator: Navigator) -> Self {
        Self { session, navigator }
    }

    /// The `Authorization` header value for the current session, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.session.bearer().map(|token| format!("Bearer {token}"))
    }

    /// Attach `Authorization: Bearer <token>` when a token is present.
    #[must_use]
    pub fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// React to a failed response.
    ///
    /// On 401 or 403 the session is cleared and navigation goes to login.
    /// Returns whether the session was cleared. Other statuses are left to
    /// the caller.
    pub fn on_error_status(&self, status: StatusCode) -> bool {
        if !is_auth_failure(status) {
            return false;
        }
        tracing::warn!(status = %status, "Authorization rejected, clearing session");
        self.session.clear();
        self.navigator.redirect_to_login();
        true
    }
}

/// Whether `status` means the credentials were rejected.
#[must_use]
pub fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}
