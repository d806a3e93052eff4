//! Client-side state stores.
//!
//! Each store owns one piece of application state, persists it under a fixed
//! storage key on every mutation and publishes the new value to subscribers.
//! Stores are cheap `Clone` handles; construct each one once (see
//! [`crate::state::AppState`]) and pass it to whatever needs it.

mod cart;
mod favorites;
mod persistent;
mod session;

pub use cart::CartStore;
pub use favorites::FavoritesStore;
pub use persistent::PersistentStore;
pub use session::SessionStore;
