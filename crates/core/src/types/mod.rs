//! Core types for Corner Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod quantity;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
