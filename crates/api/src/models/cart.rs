//! Cart domain types.

use chrono::{DateTime, Utc};

use corner_shop_core::{CartId, CartItemId, CustomerId, Price, ProductId, Quantity};

/// A named cart belonging to one customer.
///
/// A customer may own several carts; `(customer_id, name)` is unique.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: CartId,
    pub customer_id: CustomerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One product entry in a cart.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart item joined with the product it refers to.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item_id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub description: String,
    pub price: Price,
    pub quantity: Quantity,
}

/// A cart together with its lines, ordered by item ID.
#[derive(Debug, Clone)]
pub struct CartContents {
    pub cart: Cart,
    pub lines: Vec<CartLine>,
}
