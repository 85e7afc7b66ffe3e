//! Domain models for the shop.
//!
//! These types are validated domain objects, separate from the database row
//! types in [`crate::db`] and the JSON views in [`crate::routes`].

pub mod cart;
pub mod customer;
pub mod product;

pub use cart::{Cart, CartContents, CartItem, CartLine};
pub use customer::Customer;
pub use product::Product;

use chrono::{DateTime, Utc};

/// Timestamp layout used in every JSON response.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp for API responses (`YYYY-MM-DD HH:MM:SS`, UTC).
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
