//! MLK Shop storefront client library.
//!
//! Client-side state and API access for the MLK Shop REST backend:
//!
//! - [`stores`] - session, cart and favorites, persisted through a
//!   [`storage::KeyValueStore`] and observable by the UI
//! - [`routes`] - views, navigation and the admin route guard
//! - [`middleware`] - bearer-token decoration and 401/403 handling
//! - [`api`] - the REST client
//! - [`services`] - auth, orders, confirmation modals and notifications
//! - [`state`] - the application context tying it all together
//!
//! # Example
//!
//! ```rust,ignore
//! use mlk_shop_storefront::{config::StorefrontConfig, state::AppState};
//!
//! let state = AppState::open(StorefrontConfig::from_env()?)?;
//! state.auth().login("admin", "admin").await?;
//! assert!(state.session().is_admin());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod observable;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod stores;

pub use error::{AppError, Result, ValidationError};
pub use state::AppState;
