//! HTTP route handlers for the shop API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database)
//!
//! # Customers
//! GET  /login                   - List customers
//! POST /login                   - Login (rate limited)
//! PUT  /customer/{id}/address   - Update address
//! PUT  /customer/{id}/password  - Change password
//! GET  /customer/{id}/carts     - List the customer's carts
//!
//! # Products
//! GET  /products/search         - Search by name and price range
//! POST /products/cart           - Add a product to a named cart
//! ```

pub mod carts;
pub mod customers;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::login_rate_limiter;
use crate::state::AppState;

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(customers::list_customers)
                .merge(post(customers::login).layer(login_rate_limiter())),
        )
        .route("/customer/{id}/address", put(customers::update_address))
        .route("/customer/{id}/password", put(customers::change_password))
        .route("/customer/{id}/carts", get(carts::list_customer_carts))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products/search", get(products::search_products))
        .route("/products/cart", post(carts::add_to_cart))
}

/// Create the main router with all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(customer_routes())
        .merge(product_routes())
}
