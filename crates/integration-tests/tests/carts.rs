//! Integration tests for cart endpoints.
//!
//! These tests require a `PostgreSQL` server reachable via `DATABASE_URL`.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use corner_shop_integration_tests::TestApp;

// ============================================================================
// Add to cart
// ============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_add_creates_cart_then_combines_quantities(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer("malee@example.com", "correct-horse").await;
    let rice = app.product("Jasmine Rice 5kg", 1250, 5).await;

    let add = json!({
        "customer_id": customer,
        "product_id": rice,
        "quantity": 2,
        "cart_name": "weekly",
    });

    let (status, body) = app.post("/products/cart", add.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product added to cart successfully");
    let cart_id = body["cart_id"].clone();

    let (status, body) = app.post("/products/cart", add).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart_id"], cart_id);

    let (_, body) = app.get(&format!("/customer/{customer}/carts")).await;
    let carts = body["carts"].as_array().unwrap();
    assert_eq!(carts.len(), 1);
    assert_eq!(carts[0]["items"][0]["quantity"], 4);

    // Stock is not reserved by adding to a cart.
    let (_, body) = app.get("/products/search").await;
    assert_eq!(body["products"][0]["stock_quantity"], 5);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_adding_to_existing_cart_leaves_it_untouched(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer("malee@example.com", "correct-horse").await;
    let rice = app.product("Jasmine Rice 5kg", 1250, 50).await;

    let add = |cart_name: &str| {
        json!({
            "customer_id": customer,
            "product_id": rice,
            "quantity": 1,
            "cart_name": cart_name,
        })
    };

    let (_, body) = app.post("/products/cart", add("weekly")).await;
    let weekly = body["cart_id"].as_i64().unwrap();
    let (_, before) = app.get(&format!("/customer/{customer}/carts")).await;

    for _ in 0..3 {
        let (status, body) = app.post("/products/cart", add("weekly")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cart_id"].as_i64().unwrap(), weekly);
    }

    let (_, after) = app.get(&format!("/customer/{customer}/carts")).await;
    assert_eq!(after["carts"][0]["updated_at"], before["carts"][0]["updated_at"]);

    // No cart IDs were consumed by the repeated adds.
    let (_, body) = app.post("/products/cart", add("party")).await;
    assert_eq!(body["cart_id"].as_i64().unwrap(), weekly + 1);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_add_checks_stock(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer("malee@example.com", "correct-horse").await;
    let sauce = app.product("Fish Sauce", 325, 3).await;

    let add = |quantity: i32| {
        json!({
            "customer_id": customer,
            "product_id": sauce,
            "quantity": quantity,
            "cart_name": "party",
        })
    };

    let (status, body) = app.post("/products/cart", add(4)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient stock");

    let (status, _) = app.post("/products/cart", add(2)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post("/products/cart", add(2)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient stock for updated quantity");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_add_with_unknown_references(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer("malee@example.com", "correct-horse").await;
    let rice = app.product("Jasmine Rice 5kg", 1250, 5).await;

    let (status, body) = app
        .post(
            "/products/cart",
            json!({"customer_id": 9999, "product_id": rice, "quantity": 1, "cart_name": "x"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");

    let (status, body) = app
        .post(
            "/products/cart",
            json!({"customer_id": customer, "product_id": 9999, "quantity": 1, "cart_name": "x"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");

    // Failed additions leave no cart behind.
    let (_, body) = app.get(&format!("/customer/{customer}/carts")).await;
    assert_eq!(body["carts"], json!([]));
}

// ============================================================================
// Listing
// ============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_list_carts_with_items(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer("malee@example.com", "correct-horse").await;
    let other = app.customer("somchai@example.com", "correct-horse").await;
    let rice = app.product("Jasmine Rice 5kg", 1250, 50).await;
    let milk = app.product("Coconut Milk", 199, 50).await;

    for (who, product, cart) in [
        (customer, rice, "weekly"),
        (customer, milk, "weekly"),
        (customer, milk, "party"),
        (other, rice, "weekly"),
    ] {
        let (status, _) = app
            .post(
                "/products/cart",
                json!({"customer_id": who, "product_id": product, "quantity": 1, "cart_name": cart}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app.get(&format!("/customer/{customer}/carts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let carts = body["carts"].as_array().unwrap();
    assert_eq!(carts.len(), 2);
    assert_eq!(carts[0]["cart_name"], "weekly");
    assert_eq!(carts[1]["cart_name"], "party");

    let weekly = carts[0]["items"].as_array().unwrap();
    assert_eq!(weekly.len(), 2);
    assert_eq!(weekly[0]["product_name"], "Jasmine Rice 5kg");
    assert_eq!(weekly[0]["price"], "12.50");
    assert_eq!(weekly[1]["product_name"], "Coconut Milk");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_list_carts_for_customer_without_carts_or_unknown(pool: PgPool) {
    let app = TestApp::new(pool);
    let customer = app.customer("malee@example.com", "correct-horse").await;

    let (status, body) = app.get(&format!("/customer/{customer}/carts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["carts"], json!([]));

    let (status, body) = app.get("/customer/4242/carts").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");
}
