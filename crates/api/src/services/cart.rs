//! Cart service.
//!
//! Adding a product runs in a single transaction: the product row is locked
//! first, so concurrent additions of the same product are serialised and the
//! stock check always sees the committed cart quantity.

use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, instrument};

use corner_shop_core::{CartId, CustomerId, ProductId, Quantity};

use crate::db::{RepositoryError, carts, customers, products};
use crate::models::CartContents;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The customer does not exist.
    #[error("customer not found")]
    CustomerNotFound,

    /// The product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// Not enough stock for the requested quantity.
    #[error("insufficient stock")]
    InsufficientStock,

    /// Not enough stock once the existing cart quantity is included.
    #[error("insufficient stock for updated quantity")]
    InsufficientStockForUpdate,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CartError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// A request to put `quantity` units of a product into a named cart.
#[derive(Debug, Clone)]
pub struct AddToCart {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub cart_name: String,
}

/// Cart service.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a product to the customer's named cart, creating the cart if needed.
    ///
    /// Returns the ID of the cart the product was added to. Stock is checked
    /// but not decremented.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CustomerNotFound` / `CartError::ProductNotFound` for
    /// unknown references, `CartError::InsufficientStock` if the product has
    /// fewer units than requested, and `CartError::InsufficientStockForUpdate`
    /// if the combined cart quantity would exceed stock.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, product_id = %request.product_id))]
    pub async fn add_product(&self, request: &AddToCart) -> Result<CartId, CartError> {
        let mut tx = self.pool.begin().await?;

        if !customers::exists(&mut *tx, request.customer_id).await? {
            return Err(CartError::CustomerNotFound);
        }

        let product = products::lock_by_id(&mut *tx, request.product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        if !product.has_stock_for(request.quantity) {
            return Err(CartError::InsufficientStock);
        }

        let cart = carts::find_or_create(&mut *tx, request.customer_id, &request.cart_name).await?;

        match carts::find_item(&mut *tx, cart.id, product.id).await? {
            Some(item) => {
                let combined = item
                    .quantity
                    .checked_add(request.quantity)
                    .filter(|q| product.has_stock_for(*q))
                    .ok_or(CartError::InsufficientStockForUpdate)?;
                carts::set_item_quantity(&mut *tx, item.id, combined).await?;
                debug!(cart_id = %cart.id, quantity = %combined, "updated cart item");
            }
            None => {
                carts::insert_item(&mut *tx, cart.id, product.id, request.quantity).await?;
                debug!(cart_id = %cart.id, quantity = %request.quantity, "inserted cart item");
            }
        }

        tx.commit().await?;
        Ok(cart.id)
    }

    /// List a customer's carts with product details.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CustomerNotFound` if the customer doesn't exist.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CartContents>, CartError> {
        if !customers::exists(self.pool, customer_id).await? {
            return Err(CartError::CustomerNotFound);
        }

        Ok(carts::list_for_customer(self.pool, customer_id).await?)
    }
}
