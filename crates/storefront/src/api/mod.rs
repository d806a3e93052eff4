//! REST API client for the shop backend.
//!
//! Each domain operation maps to exactly one HTTP request with a fixed method
//! and path, relative to the configured base URL. Failures are surfaced
//! immediately; nothing is retried.
//!
//! # Endpoints
//!
//! ```text
//! GET    /product           - list products
//! GET    /product/{id}      - fetch one product
//! POST   /product           - create product (admin)
//! PUT    /product/{id}      - update product (admin)
//! DELETE /product/{id}      - delete product (admin)
//! POST   /order             - place order, plain-text response
//! POST   /auth/login        - log in
//! POST   /auth/register     - register
//! ```

mod images;

pub use images::{PLACEHOLDER_IMAGE, resolve_image_url};

use std::sync::Arc;
use std::time::Duration;

use mlk_shop_core::ProductId;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::middleware::AuthInterceptor;
use crate::models::{AuthResponse, LoginRequest, OrderRequest, Product, RegisterRequest};

/// Longest server body kept in an error message.
const MAX_ERROR_BODY: usize = 500;

// =============================================================================
// Errors
// =============================================================================

/// Errors from the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, possibly empty.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An id cannot be used as a single path segment.
    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),
}

impl ApiError {
    /// The HTTP status, when the server responded.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            Self::Parse(_) | Self::InvalidUrl(_) | Self::InvalidSegment(_) => None,
        }
    }

    /// Text suitable for display: the server's message when it sent one,
    /// otherwise the status reason phrase.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            Self::Status { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map_or_else(|| format!("Request failed ({status})"), str::to_string),
            Self::Network(_) => "Could not reach the server".to_string(),
            Self::Parse(_) => "Unexpected response from the server".to_string(),
            Self::InvalidUrl(_) | Self::InvalidSegment(_) => "Invalid request".to_string(),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend answers with either plain text or a JSON object carrying a
/// `message` or `error` field.
fn error_message(body: &str) -> String {
    let body = body.trim();
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["message", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(field) {
                return message.trim().chars().take(MAX_ERROR_BODY).collect();
            }
        }
    }
    body.chars().take(MAX_ERROR_BODY).collect()
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the shop REST API.
///
/// Every request passes through the [`AuthInterceptor`]. Cloning is cheap and
/// shares the underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    interceptor: AuthInterceptor,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        interceptor: AuthInterceptor,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mlk-shop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                interceptor,
            }),
        })
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.send(Method::GET, &["product"], None::<&()>).await?;
        json(response).await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let response = self
            .send(Method::GET, &["product", id.as_str()], None::<&()>)
            .await?;
        json(response).await
    }

    /// Create a product. The cover image defaults to the first image.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip(self, product), fields(sku = %product.sku_code))]
    pub async fn create_product(&self, mut product: Product) -> Result<Product, ApiError> {
        product.normalize_cover();
        let response = self.send(Method::POST, &["product"], Some(&product)).await?;
        let created: Product = json(response).await?;
        tracing::info!(product_id = ?created.id, "Product created");
        Ok(created)
    }

    /// Replace the product with `id`. The cover image defaults to the first image.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip(self, product), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        mut product: Product,
    ) -> Result<Product, ApiError> {
        product.normalize_cover();
        let response = self
            .send(Method::PUT, &["product", id.as_str()], Some(&product))
            .await?;
        json(response).await
    }

    /// Delete the product with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &["product", id.as_str()], None::<&()>)
            .await?;
        tracing::info!("Product deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Place an order. The server answers with a plain-text confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip(self, order), fields(sku = %order.sku_code, quantity = order.quantity))]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<String, ApiError> {
        let response = self.send(Method::POST, &["order"], Some(order)).await?;
        Ok(response.text().await?)
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    /// Exchange credentials for a user and token.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthResponse, ApiError> {
        let response = self
            .send(Method::POST, &["auth", "login"], Some(request))
            .await?;
        json(response).await
    }

    /// Create an account. The response has the same shape as login.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .send(Method::POST, &["auth", "register"], Some(request))
            .await?;
        json(response).await
    }

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner
            .interceptor
            .decorate(self.inner.client.request(method, url))
    }

    /// Send one request and map non-success statuses to [`ApiError::Status`].
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = endpoint(&self.inner.base_url, segments)?;
        let path = url.path().to_owned();
        let mut request = self.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(%method, path = %path, status = status.as_u16(), "API request succeeded");
            return Ok(response);
        }

        self.inner.interceptor.on_error_status(status);

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        tracing::warn!(%method, path = %path, status = status.as_u16(), message = %message, "API request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(MAX_ERROR_BODY).collect::<String>(),
            "Failed to parse API response"
        );
        ApiError::Parse(e)
    })
}

/// Append `segments` to the base path, each percent-encoded as exactly one
/// segment. Empty, `.` and `..` segments are rejected.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    if let Some(bad) = segments
        .iter()
        .find(|s| s.is_empty() || matches!(**s, "." | ".."))
    {
        return Err(ApiError::InvalidSegment((*bad).to_owned()));
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
