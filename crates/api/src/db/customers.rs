//! Customer repository for database operations.
//!
//! Emails are matched case-insensitively (`LOWER(email)` has a unique index).

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::warn;

use corner_shop_core::{CustomerId, Email};

use super::RepositoryError;
use crate::models::Customer;

const CUSTOMER_COLUMNS: &str = "customer_id, first_name, last_name, email, phone_number, \
                                address, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    customer_id: i32,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        if let Err(e) = Email::parse(&row.email) {
            warn!(customer_id = row.customer_id, error = %e, "stored email is malformed");
        }

        Self {
            id: CustomerId::new(row.customer_id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Customer row plus the stored password column.
#[derive(Debug, sqlx::FromRow)]
struct CustomerPasswordRow {
    #[sqlx(flatten)]
    customer: CustomerRow,
    password: String,
}

impl From<CustomerPasswordRow> for (Customer, String) {
    fn from(row: CustomerPasswordRow) -> Self {
        (row.customer.into(), row.password)
    }
}

/// Fields required to create a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone_number: String,
    pub address: String,
    /// Already-hashed password.
    pub password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every customer ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY customer_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Get a customer and their stored password by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(Customer, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerPasswordRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS}, password FROM customer WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a customer and their stored password by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<(Customer, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerPasswordRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS}, password FROM customer WHERE customer_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Replace a customer's address and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_address(
        &self,
        id: CustomerId,
        address: &str,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customer SET address = $2, updated_at = NOW() \
             WHERE customer_id = $1 RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id)
        .bind(address)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Store a new password hash for a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_password(
        &self,
        id: CustomerId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE customer SET password = $2, updated_at = NOW() WHERE customer_id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewCustomer) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO customer (first_name, last_name, email, phone_number, address, password) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone_number)
        .bind(&new.address)
        .bind(&new.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "email already exists"))?;

        Ok(row.into())
    }
}

/// Check whether a customer exists, using any executor (pool or transaction).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn exists<'e, E>(executor: E, id: CustomerId) -> Result<bool, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM customer WHERE customer_id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;

    Ok(exists)
}
