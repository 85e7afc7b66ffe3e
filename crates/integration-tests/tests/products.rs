//! Integration tests for product search.
//!
//! These tests require a `PostgreSQL` server reachable via `DATABASE_URL`.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::Value;
use sqlx::PgPool;

use corner_shop_integration_tests::TestApp;

fn names(body: &Value) -> Vec<String> {
    body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["product_name"].as_str().unwrap().to_string())
        .collect()
}

async fn catalogue(pool: PgPool) -> TestApp {
    let app = TestApp::new(pool);
    app.product("Jasmine Rice 5kg", 1250, 40).await;
    app.product("Sticky Rice 1kg", 300, 10).await;
    app.product("Fish Sauce", 325, 60).await;
    app.product("100% Coconut Milk", 199, 5).await;
    app
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_search_without_filters_returns_all_in_id_order(pool: PgPool) {
    let app = catalogue(pool).await;

    let (status, body) = app.get("/products/search").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(
        names(&body),
        [
            "Jasmine Rice 5kg",
            "Sticky Rice 1kg",
            "Fish Sauce",
            "100% Coconut Milk"
        ]
    );
    assert_eq!(body["products"][0]["price"], "12.50");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_search_by_name_is_case_insensitive(pool: PgPool) {
    let app = catalogue(pool).await;

    let (status, body) = app.get("/products/search?product_name=RICE").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), ["Jasmine Rice 5kg", "Sticky Rice 1kg"]);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_search_treats_wildcards_literally(pool: PgPool) {
    let app = catalogue(pool).await;

    // "%" URL-encoded; must match the literal percent sign only.
    let (_, body) = app.get("/products/search?product_name=0%25").await;
    assert_eq!(names(&body), ["100% Coconut Milk"]);

    let (_, body) = app.get("/products/search?product_name=_").await;
    assert!(names(&body).is_empty());
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_search_by_price_range(pool: PgPool) {
    let app = catalogue(pool).await;

    let (_, body) = app
        .get("/products/search?min_price=3.00&max_price=3.25")
        .await;
    assert_eq!(names(&body), ["Sticky Rice 1kg", "Fish Sauce"]);

    let (_, body) = app
        .get("/products/search?product_name=rice&min_price=10")
        .await;
    assert_eq!(names(&body), ["Jasmine Rice 5kg"]);

    // Empty values are ignored.
    let (status, body) = app.get("/products/search?min_price=&max_price=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body).len(), 4);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_price_bounds_are_not_rounded(pool: PgPool) {
    let app = catalogue(pool).await;

    // 1.99 would be included if the bound were rounded to cents.
    let (_, body) = app.get("/products/search?min_price=1.994").await;
    assert!(!names(&body).contains(&"100% Coconut Milk".to_string()));

    // 3.25 would be included if 3.249 were rounded to cents.
    let (_, body) = app
        .get("/products/search?min_price=3&max_price=3.249")
        .await;
    assert_eq!(names(&body), ["Sticky Rice 1kg"]);
}
