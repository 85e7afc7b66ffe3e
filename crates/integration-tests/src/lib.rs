//! Integration tests for Corner Shop.
//!
//! # Running Tests
//!
//! ```bash
//! # Database-backed tests (each test gets a fresh, migrated database)
//! DATABASE_URL=postgres://localhost/corner_shop_test \
//!     cargo test -p corner-shop-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `customers` - Login, listing, address and password changes
//! - `products` - Product search filters
//! - `carts` - Adding to carts and listing carts
//! - `live_server` - Smoke test against a running server (`SHOP_BASE_URL`)
//!
//! The database tests drive the router in-process with `tower::ServiceExt`,
//! so no server needs to be running for them.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use corner_shop_api::config::ShopConfig;
use corner_shop_api::db::customers::{CustomerRepository, NewCustomer};
use corner_shop_api::db::products::{NewProduct, ProductRepository};
use corner_shop_api::services::auth::hash_password;
use corner_shop_api::state::AppState;
use corner_shop_core::{CustomerId, Email, Price, ProductId};

/// The API wired to a test database.
#[derive(Clone)]
pub struct TestApp {
    state: AppState,
    pub pool: PgPool,
}

impl TestApp {
    /// Build the app around a pool handed out by `#[sqlx::test]`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        // The URL is never used: the pool is already connected.
        let config = ShopConfig::from_lookup(|key| {
            (key == "SHOP_DATABASE_URL").then(|| "postgres://unused".to_string())
        })
        .expect("test config is valid");

        Self {
            state: AppState::new(config, pool.clone()),
            pool,
        }
    }

    /// Send a request and return the status with the parsed JSON body
    /// (`Value::Null` for non-JSON bodies).
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            // The login rate limiter keys on the client IP.
            .header("x-forwarded-for", "203.0.113.10");

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = corner_shop_api::service(self.state.clone())
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    /// Insert a customer whose password is stored as an Argon2 hash.
    pub async fn customer(&self, email: &str, password: &str) -> CustomerId {
        let hash = hash_password(password).expect("hashing works");
        self.customer_with_stored_password(email, &hash).await
    }

    /// Insert a customer with the password column set verbatim (e.g. a legacy
    /// plain-text value).
    pub async fn customer_with_stored_password(&self, email: &str, stored: &str) -> CustomerId {
        CustomerRepository::new(&self.pool)
            .create(&NewCustomer {
                first_name: "Test".to_string(),
                last_name: "Customer".to_string(),
                email: Email::parse(email).expect("valid email"),
                phone_number: "0811111111".to_string(),
                address: "99 Test Road".to_string(),
                password_hash: stored.to_string(),
            })
            .await
            .expect("insert customer")
            .id
    }

    /// Insert a product.
    pub async fn product(&self, name: &str, cents: i64, stock: i32) -> ProductId {
        ProductRepository::new(&self.pool)
            .create_if_absent(&NewProduct {
                name: name.to_string(),
                description: format!("{name} description"),
                price: Price::from_cents(cents).expect("valid price"),
                stock_quantity: stock,
            })
            .await
            .expect("insert product")
            .expect("product names are unique per test")
            .id
    }

    /// Overwrite a customer's email column, bypassing validation.
    pub async fn set_raw_email(&self, id: CustomerId, email: &str) {
        sqlx::query("UPDATE customer SET email = $1 WHERE customer_id = $2")
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await
            .expect("customer exists");
    }

    /// Raw value of a customer's password column.
    pub async fn stored_password(&self, id: CustomerId) -> String {
        sqlx::query_scalar("SELECT password FROM customer WHERE customer_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .expect("customer exists")
    }
}
