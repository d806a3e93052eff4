//! Request middleware for the API client.

pub mod auth;

pub use auth::{AuthInterceptor, is_auth_failure};
