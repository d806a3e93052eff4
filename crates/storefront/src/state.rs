//! Application state shared across views.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::middleware::AuthInterceptor;
use crate::routes::Navigator;
use crate::services::{AuthService, ModalService, NotificationCenter, OrderService};
use crate::storage::{FileStore, KeyValueStore};
use crate::stores::{CartStore, FavoritesStore, SessionStore};

/// Application state shared across all views.
///
/// Holds exactly one instance of every store and service. Cheaply cloneable
/// via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    session: SessionStore,
    cart: CartStore,
    favorites: FavoritesStore,
    navigator: Navigator,
    api: ApiClient,
    auth: AuthService,
    orders: OrderService,
    modal: ModalService,
    notifications: NotificationCenter,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create a new application state over `storage`.
    ///
    /// Stores restore their previous contents from `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> std::result::Result<Self, ApiError> {
        let session = SessionStore::new(Arc::clone(&storage));
        let cart = CartStore::new(Arc::clone(&storage));
        let favorites = FavoritesStore::new(storage);
        let navigator = Navigator::new(session.clone());

        let interceptor = AuthInterceptor::new(session.clone(), navigator.clone());
        let api = ApiClient::new(
            config.api_base_url.clone(),
            config.http_timeout,
            interceptor,
        )?;
        let auth = AuthService::new(api.clone(), session.clone());
        let orders = OrderService::new(api.clone(), session.clone(), cart.clone());

        tracing::debug!(
            api = %config.api_base_url,
            authenticated = session.is_authenticated(),
            cart_items = cart.count(),
            "Application state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                cart,
                favorites,
                navigator,
                api,
                auth,
                orders,
                modal: ModalService::new(),
                notifications: NotificationCenter::new(),
            }),
        })
    }

    /// Create application state persisted in `config.storage_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created or the
    /// HTTP client cannot be built.
    pub fn open(config: StorefrontConfig) -> Result<Self> {
        let storage = FileStore::open(config.storage_dir.clone())?;
        Ok(Self::new(config, Arc::new(storage))?)
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.inner.navigator
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    #[must_use]
    pub fn modal(&self) -> &ModalService {
        &self.inner.modal
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }

    /// Resolve a product image reference against the configured asset base.
    #[must_use]
    pub fn image_url(&self, value: Option<&str>) -> String {
        crate::api::resolve_image_url(value, self.inner.config.asset_base_url.as_ref())
    }
}
