//! Cart and cart item queries.
//!
//! The write helpers take any `PgExecutor` (or a connection, when they need
//! more than one statement) so the cart service can run them inside one
//! transaction together with the product row lock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor, PgPool};

use corner_shop_core::{CartId, CartItemId, CustomerId, Price, ProductId, Quantity};

use super::RepositoryError;
use crate::models::{Cart, CartContents, CartItem, CartLine};

const CART_COLUMNS: &str = "cart_id, customer_id, cart_name, created_at, updated_at";
const ITEM_COLUMNS: &str = "cart_item_id, cart_id, product_id, quantity, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    cart_id: i32,
    customer_id: i32,
    cart_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.cart_id),
            customer_id: CustomerId::new(row.customer_id),
            name: row.cart_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    cart_item_id: i32,
    cart_id: i32,
    product_id: i32,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(row.quantity).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cart item quantity: {e}"))
        })?;

        Ok(Self {
            id: CartItemId::new(row.cart_item_id),
            cart_id: CartId::new(row.cart_id),
            product_id: ProductId::new(row.product_id),
            quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Cart item joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    cart_id: i32,
    cart_item_id: i32,
    product_id: i32,
    product_name: String,
    description: String,
    price: Price,
    quantity: i32,
}

impl TryFrom<CartLineRow> for (CartId, CartLine) {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(row.quantity).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cart item quantity: {e}"))
        })?;

        Ok((
            CartId::new(row.cart_id),
            CartLine {
                item_id: CartItemId::new(row.cart_item_id),
                product_id: ProductId::new(row.product_id),
                product_name: row.product_name,
                description: row.description,
                price: row.price,
                quantity,
            },
        ))
    }
}

// =============================================================================
// Reads
// =============================================================================

/// List a customer's carts with their lines.
///
/// Carts are ordered by cart ID and lines by cart item ID. Both reads run in
/// one `REPEATABLE READ` snapshot, so a cart added between them cannot show
/// up without its lines.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
/// Returns `RepositoryError::DataCorruption` if a stored quantity is invalid.
pub async fn list_for_customer(
    pool: &PgPool,
    customer_id: CustomerId,
) -> Result<Vec<CartContents>, RepositoryError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let carts = sqlx::query_as::<_, CartRow>(&format!(
        "SELECT {CART_COLUMNS} FROM cart WHERE customer_id = $1 ORDER BY cart_id"
    ))
    .bind(customer_id)
    .fetch_all(&mut *tx)
    .await?;

    let lines = sqlx::query_as::<_, CartLineRow>(
        r"
        SELECT ci.cart_id, ci.cart_item_id, ci.product_id,
               p.product_name, p.description, p.price, ci.quantity
        FROM cart_item ci
        JOIN cart c ON c.cart_id = ci.cart_id
        JOIN product p ON p.product_id = ci.product_id
        WHERE c.customer_id = $1
        ORDER BY ci.cart_id, ci.cart_item_id
        ",
    )
    .bind(customer_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let lines = lines
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<(CartId, CartLine)>, _>>()?;

    Ok(group_lines(carts.into_iter().map(Cart::from), lines))
}

/// Attach lines to their carts, preserving the order of both inputs.
///
/// Lines whose cart is not in `carts` are dropped.
fn group_lines(
    carts: impl Iterator<Item = Cart>,
    lines: Vec<(CartId, CartLine)>,
) -> Vec<CartContents> {
    let mut contents: Vec<CartContents> = carts
        .map(|cart| CartContents {
            cart,
            lines: Vec::new(),
        })
        .collect();

    let index: HashMap<CartId, usize> = contents
        .iter()
        .enumerate()
        .map(|(i, c)| (c.cart.id, i))
        .collect();

    for (cart_id, line) in lines {
        if let Some(entry) = index.get(&cart_id).and_then(|&i| contents.get_mut(i)) {
            entry.lines.push(line);
        }
    }

    contents
}

// =============================================================================
// Writes
// =============================================================================

/// Return the customer's cart with this name, creating it when absent.
///
/// An existing cart is locked, not rewritten. The row is only inserted when
/// no cart with this name exists.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the cart vanished after a
/// concurrent insert won the race.
/// Returns `RepositoryError::Database` if a query fails.
pub async fn find_or_create(
    conn: &mut PgConnection,
    customer_id: CustomerId,
    name: &str,
) -> Result<Cart, RepositoryError> {
    if let Some(cart) = lock_by_name(&mut *conn, customer_id, name).await? {
        return Ok(cart);
    }

    let inserted = sqlx::query_as::<_, CartRow>(&format!(
        "INSERT INTO cart (customer_id, cart_name) VALUES ($1, $2) \
         ON CONFLICT (customer_id, cart_name) DO NOTHING \
         RETURNING {CART_COLUMNS}"
    ))
    .bind(customer_id)
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(row) = inserted {
        return Ok(row.into());
    }

    // Another transaction created the cart between our select and insert.
    lock_by_name(&mut *conn, customer_id, name)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Load a customer's cart by name and lock it until the transaction ends.
async fn lock_by_name<'e, E>(
    executor: E,
    customer_id: CustomerId,
    name: &str,
) -> Result<Option<Cart>, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, CartRow>(&format!(
        "SELECT {CART_COLUMNS} FROM cart \
         WHERE customer_id = $1 AND cart_name = $2 FOR UPDATE"
    ))
    .bind(customer_id)
    .bind(name)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Cart::from))
}

/// Find the item for `product_id` in a cart, locking it for update.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_item<'e, E>(
    executor: E,
    cart_id: CartId,
    product_id: ProductId,
) -> Result<Option<CartItem>, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, CartItemRow>(&format!(
        "SELECT {ITEM_COLUMNS} FROM cart_item \
         WHERE cart_id = $1 AND product_id = $2 FOR UPDATE"
    ))
    .bind(cart_id)
    .bind(product_id)
    .fetch_optional(executor)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// Insert a new cart item.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the product is already in the cart.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert_item<'e, E>(
    executor: E,
    cart_id: CartId,
    product_id: ProductId,
    quantity: Quantity,
) -> Result<CartItem, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, CartItemRow>(&format!(
        "INSERT INTO cart_item (cart_id, product_id, quantity) VALUES ($1, $2, $3) \
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity.get())
    .fetch_one(executor)
    .await
    .map_err(|e| RepositoryError::from_insert(e, "product already in cart"))?;

    row.try_into()
}

/// Overwrite the quantity of an existing cart item.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the item doesn't exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn set_item_quantity<'e, E>(
    executor: E,
    item_id: CartItemId,
    quantity: Quantity,
) -> Result<CartItem, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, CartItemRow>(&format!(
        "UPDATE cart_item SET quantity = $2, updated_at = NOW() \
         WHERE cart_item_id = $1 RETURNING {ITEM_COLUMNS}"
    ))
    .bind(item_id)
    .bind(quantity.get())
    .fetch_optional(executor)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    row.try_into()
}
