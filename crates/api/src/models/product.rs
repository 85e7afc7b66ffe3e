//! Product domain types.

use chrono::{DateTime, Utc};

use corner_shop_core::{Price, ProductId, Quantity};

/// A catalogue product (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Units on hand. Never negative.
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether `quantity` units can be taken from stock.
    #[must_use]
    pub const fn has_stock_for(&self, quantity: Quantity) -> bool {
        self.stock_quantity >= quantity.get()
    }
}
