//! Services used by the views.
//!
//! - `auth` - login, registration and logout against the API
//! - `modal` - confirmation dialogs answered by the UI
//! - `notifications` - transient messages for the user
//! - `orders` - order placement and cart checkout

pub mod auth;
pub mod modal;
pub mod notifications;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use modal::{ConfirmHandle, ConfirmModalRequest, ModalService};
pub use notifications::{Notification, NotificationCenter};
pub use orders::OrderService;
