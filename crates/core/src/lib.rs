//! MLK Shop Core - Shared domain types.
//!
//! This crate provides the value types used by the storefront client and the
//! `mlk` command-line front end:
//! - `storefront` - State stores, auth gate and REST client
//! - `cli` - Terminal front end driving the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
