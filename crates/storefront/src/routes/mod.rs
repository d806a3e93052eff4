//! Client-side views and navigation.
//!
//! # Route Structure
//!
//! ```text
//! /                  - Home (product listing)
//! /login             - Login and registration
//! /cart              - Cart
//! /favorites         - Favorites
//! /product/:id       - Product detail
//!
//! # Admin (guarded by AdminGuard)
//! /admin             - Admin dashboard
//! /add-product       - New product form
//! /edit-product/:id  - Edit product form
//! ```

mod guard;

pub use guard::{AdminGuard, GuardDecision};

use std::fmt;

use mlk_shop_core::ProductId;

use crate::observable::{Observable, Subscription};
use crate::stores::SessionStore;

/// A navigable view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    Login,
    Cart,
    Favorites,
    ProductDetail(ProductId),
    AdminDashboard,
    AddProduct,
    EditProduct(ProductId),
}

impl Route {
    /// Whether entering this route requires an admin session.
    #[must_use]
    pub const fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::AdminDashboard | Self::AddProduct | Self::EditProduct(_)
        )
    }

    /// The URL path of this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Cart => "/cart".to_string(),
            Self::Favorites => "/favorites".to_string(),
            Self::ProductDetail(id) => format!("/product/{id}"),
            Self::AdminDashboard => "/admin".to_string(),
            Self::AddProduct => "/add-product".to_string(),
            Self::EditProduct(id) => format!("/edit-product/{id}"),
        }
    }

    /// Parse a URL path. Unknown paths yield `None`.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_matches('/');
        let mut segments = trimmed.split('/');
        let route = match (segments.next(), segments.next()) {
            (Some(""), None) => Self::Home,
            (Some("login"), None) => Self::Login,
            (Some("cart"), None) => Self::Cart,
            (Some("favorites"), None) => Self::Favorites,
            (Some("admin"), None) => Self::AdminDashboard,
            (Some("add-product"), None) => Self::AddProduct,
            (Some("product"), Some(id)) if !id.is_empty() => Self::ProductDetail(id.into()),
            (Some("edit-product"), Some(id)) if !id.is_empty() => Self::EditProduct(id.into()),
            _ => return None,
        };
        if segments.next().is_some() {
            return None;
        }
        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Holds the current route and enforces route guards on navigation.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Observable<Route>,
    session: SessionStore,
}

impl Navigator {
    /// Create a navigator starting at [`Route::Home`].
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        Self {
            current: Observable::new(Route::Home),
            session,
        }
    }

    /// The route currently displayed.
    #[must_use]
    pub fn current(&self) -> Route {
        self.current.get()
    }

    /// Navigate to `route`, consulting [`AdminGuard`] for admin routes.
    ///
    /// Returns the route actually entered, which is the login route when
    /// the guard denies entry.
    pub fn navigate(&self, route: Route) -> Route {
        let target = if route.requires_admin() {
            match AdminGuard::check(&self.session.current()) {
                GuardDecision::Allow => route,
                GuardDecision::Redirect(to) => {
                    tracing::info!(denied = %route, redirect = %to, "Route guard denied entry");
                    to
                }
            }
        } else {
            route
        };
        self.current.set(target.clone());
        target
    }

    /// Go to login without consulting any guard.
    pub fn redirect_to_login(&self) {
        self.current.set(Route::Login);
    }

    /// Subscribe to route changes. The current route is delivered immediately.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Route) + Send + Sync + 'static,
    {
        self.current.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mlk_shop_core::Role;

    use super::*;
    use crate::models::User;
    use crate::storage::MemoryStore;

    #[test]
    fn test_path_parse_roundtrip() {
        let routes = [
            Route::Home,
            Route::Login,
            Route::Cart,
            Route::Favorites,
            Route::ProductDetail("p1".into()),
            Route::AdminDashboard,
            Route::AddProduct,
            Route::EditProduct("p9".into()),
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Route::parse("/nope"), None);
        assert_eq!(Route::parse("/product/"), None);
        assert_eq!(Route::parse("/product/a/b"), None);
    }

    #[test]
    fn test_navigate_admin_route_as_anonymous_redirects() {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        let nav = Navigator::new(session);
        assert_eq!(nav.navigate(Route::AdminDashboard), Route::Login);
        assert_eq!(nav.current(), Route::Login);
    }

    #[test]
    fn test_navigate_admin_route_as_admin() {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        session.sign_in(
            User {
                username: "admin".to_string(),
                email: None,
                role: Role::Admin,
            },
            None,
        );
        let nav = Navigator::new(session);
        assert_eq!(nav.navigate(Route::AddProduct), Route::AddProduct);
    }

    #[test]
    fn test_public_routes_never_guarded() {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        let nav = Navigator::new(session);
        assert_eq!(nav.navigate(Route::Cart), Route::Cart);
        assert_eq!(
            nav.navigate(Route::ProductDetail("p1".into())),
            Route::ProductDetail("p1".into())
        );
    }
}
