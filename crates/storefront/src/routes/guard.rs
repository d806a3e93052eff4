//! Admin route guard.

use super::Route;
use crate::models::Session;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Entry permitted.
    Allow,
    /// Entry denied; go to this route instead.
    Redirect(Route),
}

impl GuardDecision {
    /// Whether entry was permitted.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Guard for the admin views.
///
/// The decision is a pure function of the session snapshot: no storage
/// access, no network.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminGuard;

impl AdminGuard {
    /// Allow iff the session is authenticated with the admin role.
    #[must_use]
    pub const fn check(session: &Session) -> GuardDecision {
        if session.is_admin() {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(Route::Login)
        }
    }
}

#[cfg(test)]
mod tests {
    use mlk_shop_core::Role;

    use super::*;
    use crate::models::User;

    fn session(role: Role) -> Session {
        Session::Authenticated(User {
            username: "someone".to_string(),
            email: None,
            role,
        })
    }

    #[test]
    fn test_admin_allowed() {
        assert_eq!(AdminGuard::check(&session(Role::Admin)), GuardDecision::Allow);
    }

    #[test]
    fn test_non_admin_redirected_to_login() {
        for s in [Session::Anonymous, session(Role::User)] {
            let decision = AdminGuard::check(&s);
            assert!(!decision.is_allowed());
            assert_eq!(decision, GuardDecision::Redirect(Route::Login));
        }
    }
}
