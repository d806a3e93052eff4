//! Domain models for the storefront client.
//!
//! These mirror the JSON documents exchanged with the remote API and the
//! blobs kept in local storage (camelCase field names).

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem};
pub use order::{OrderRequest, UserDetails};
pub use product::{DEFAULT_CATEGORY, DEFAULT_COLORS, DEFAULT_SIZES, Product, ProductDraft};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, Session, User};
