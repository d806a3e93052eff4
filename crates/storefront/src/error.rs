//! Unified error handling.
//!
//! Each layer has its own error type; [`AppError`] unifies them for front
//! ends. [`AppError::user_message`] maps an error to text that is safe to
//! show in a notification, without leaking transport details.

use mlk_shop_core::{EmailError, PriceError};
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::storage::StorageError;

/// Client-detected input problems.
///
/// These are raised before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("{0} is required")]
    Required(&'static str),

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Price failed validation.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The operation needs a logged-in user.
    #[error("you must be logged in")]
    LoginRequired,

    /// The product has not been persisted and has no id.
    #[error("product has no id")]
    MissingProductId,

    /// The selected cover image does not exist.
    #[error("cover image {index} is out of range ({len} images)")]
    CoverOutOfRange {
        /// Selected index.
        index: usize,
        /// Number of images.
        len: usize,
    },
}

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before reaching the network.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Remote API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Persisting local state failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Navigation to an admin view was refused.
    #[error("Access denied: {0}")]
    Forbidden(String),
}

impl AppError {
    /// Text suitable for display to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) | Self::Auth(AuthError::Validation(err)) => err.to_string(),
            Self::Api(err) | Self::Auth(AuthError::Api(err)) => err.user_message(),
            Self::Storage(_) => "Could not save your changes locally".to_string(),
            Self::Config(err) => err.to_string(),
            Self::Forbidden(_) => "Admin access required".to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
