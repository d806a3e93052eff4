//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::error::ValidationError;

/// Errors that can occur during login or registration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input rejected before contacting the server.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server rejected the request or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Message to show on the login form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Api(err) => err.user_message(),
        }
    }
}
