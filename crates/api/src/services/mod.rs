//! Business services.
//!
//! Services own the rules that span more than one query (password checks,
//! the add-to-cart transaction). Simple lookups go straight to the
//! repositories in [`crate::db`].

pub mod auth;
pub mod cart;

pub use auth::{AuthError, AuthService};
pub use cart::{AddToCart, CartError, CartService};
