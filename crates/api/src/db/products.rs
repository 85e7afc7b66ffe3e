//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use corner_shop_core::{Price, ProductId};

use super::{RepositoryError, escape_like};
use crate::models::Product;

const PRODUCT_COLUMNS: &str =
    "product_id, product_name, description, price, stock_quantity, created_at, updated_at";

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    product_id: i32,
    product_name: String,
    description: String,
    price: Price,
    stock_quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.product_id),
            name: row.product_name,
            description: row.description,
            price: row.price,
            stock_quantity: row.stock_quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Optional filters for [`ProductRepository::search`]. `None` means "no constraint".
///
/// Price bounds are compared exactly as given; they are not rounded to cents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

/// Fields required to create a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock_quantity: i32,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Search the catalogue, ordered by product ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut builder = search_query(filter);
        let rows: Vec<ProductRow> = builder.build_query_as().fetch_all(self.pool).await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Insert a product unless one with the same name already exists.
    ///
    /// Returns `None` when the product was already present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_if_absent(
        &self,
        new: &NewProduct,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO product (product_name, description, price, stock_quantity) \
             SELECT $1, $2, $3, $4 \
             WHERE NOT EXISTS (SELECT 1 FROM product WHERE product_name = $1) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.stock_quantity)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }
}

/// Load a product and lock its row until the surrounding transaction ends.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lock_by_id<'e, E>(executor: E, id: ProductId) -> Result<Option<Product>, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM product WHERE product_id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Product::from))
}

/// Build the search statement for a filter.
fn search_query(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE 1=1"));

    if let Some(name) = &filter.name {
        builder.push(" AND product_name ILIKE ");
        builder.push_bind(format!("%{}%", escape_like(name)));
    }
    if let Some(min) = filter.min_price {
        builder.push(" AND price >= ");
        builder.push_bind(min);
    }
    if let Some(max) = filter.max_price {
        builder.push(" AND price <= ");
        builder.push_bind(max);
    }
    builder.push(" ORDER BY product_id");

    builder
}
