//! User identity and session types.

use std::fmt;

use mlk_shop_core::Role;
use serde::{Deserialize, Serialize};

/// The authenticated user, as persisted under the `user` storage key.
///
/// The bearer token is kept separately (see [`crate::stores::SessionStore`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

impl User {
    /// Whether this user may enter the admin panel.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Current authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// No one is logged in.
    #[default]
    Anonymous,
    /// A user is logged in.
    Authenticated(User),
}

impl Session {
    /// The logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Whether the logged-in user is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        match self {
            Self::Anonymous => false,
            Self::Authenticated(user) => user.is_admin(),
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

/// Response of the login and register endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub token: Option<String>,
}

impl AuthResponse {
    /// Split into the persisted user and the bearer token.
    #[must_use]
    pub fn into_parts(self) -> (User, Option<String>) {
        let user = User {
            username: self.username,
            email: self.email.filter(|e| !e.is_empty()),
            role: self.role,
        };
        (user, self.token.filter(|t| !t.is_empty()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_predicates() {
        assert!(!Session::Anonymous.is_authenticated());
        assert!(!Session::Anonymous.is_admin());

        let user = User {
            username: "bob".to_string(),
            email: None,
            role: Role::User,
        };
        let session = Session::Authenticated(user.clone());
        assert!(session.is_authenticated());
        assert!(!session.is_admin());

        let admin = Session::Authenticated(User {
            role: Role::Admin,
            ..user
        });
        assert!(admin.is_admin());
    }

    #[test]
    fn test_auth_response_parts() {
        let json = r#"{"username":"admin","email":null,"role":"admin","token":"t1"}"#;
        let (user, token) = serde_json::from_str::<AuthResponse>(json)
            .unwrap()
            .into_parts();
        assert_eq!(user.username, "admin");
        assert_eq!(user.email, None);
        assert!(user.is_admin());
        assert_eq!(token.as_deref(), Some("t1"));
    }

    #[test]
    fn test_register_request_wire_names() {
        let req = RegisterRequest {
            username: "ada".to_string(),
            email: "ada@mlk.shop".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["confirmPassword"], "pw");
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let login = LoginRequest {
            username: "ada",
            password: "hunter2",
        };
        let debug = format!("{login:?}");
        assert!(debug.contains("ada"));
        assert!(!debug.contains("hunter2"));

        let register = RegisterRequest {
            username: "ada".to_string(),
            email: "ada@mlk.shop".to_string(),
            password: "hunter2".to_string(),
            confirm_password: "hunter3".to_string(),
        };
        let debug = format!("{register:?}");
        assert!(debug.contains("ada@mlk.shop"));
        assert!(!debug.contains("hunter"));
        assert_eq!(debug.matches("[REDACTED]").count(), 2);
    }
}
