//! Persistent key-value storage.
//!
//! The storefront keeps its session, cart and favorites as JSON blobs under
//! fixed string keys. Storage is an injected capability so tests can use
//! [`MemoryStore`] while the CLI persists to disk with [`FileStore`].
//!
//! Every value is rewritten wholesale on mutation - nothing is patched in
//! place.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when writing to storage.
///
/// Reads never fail: an unreadable value is reported as absent.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on key '{key}': {source}")]
    Io {
        /// Storage key being written.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The key contains characters that cannot be stored.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A synchronous string-to-string store.
///
/// Implementations must be cheap to call from state store mutations and
/// must be shareable across the application (`Send + Sync`).
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage keys used by the state stores.
pub mod keys {
    /// Key for the JSON-serialized authenticated user.
    pub const USER: &str = "user";

    /// Key for the raw bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the JSON-serialized cart lines.
    pub const CART: &str = "cart";

    /// Key for the JSON-serialized favorite products.
    pub const FAVORITES: &str = "favorites";
}
