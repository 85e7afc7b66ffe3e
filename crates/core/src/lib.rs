//! Corner Shop Core - Shared domain types.
//!
//! This crate provides the types shared by every Corner Shop component:
//! - `api` - JSON HTTP backend (customers, products, carts)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP handling. Database encoding is available behind the `postgres`
//! feature so the types can be bound directly in `sqlx` queries.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, prices, and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
