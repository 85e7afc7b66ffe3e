//! Integration tests for customer endpoints.
//!
//! These tests require a `PostgreSQL` server reachable via `DATABASE_URL`;
//! `#[sqlx::test]` creates and migrates a fresh database for each test.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use corner_shop_integration_tests::TestApp;

// ============================================================================
// Login
// ============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_login_success(pool: PgPool) {
    let app = TestApp::new(pool);
    let id = app.customer("malee@example.com", "correct-horse").await;

    let (status, body) = app
        .post(
            "/login",
            json!({"email": "Malee@Example.com", "password": "correct-horse"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer_id"], id.as_i32());
    assert_eq!(body["email"], "malee@example.com");
    assert!(body.get("password").is_none());
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_login_rejects_wrong_password_and_unknown_email(pool: PgPool) {
    let app = TestApp::new(pool);
    app.customer("malee@example.com", "correct-horse").await;

    let (status, body) = app
        .post(
            "/login",
            json!({"email": "malee@example.com", "password": "wrong"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, body) = app
        .post(
            "/login",
            json!({"email": "nobody@example.com", "password": "correct-horse"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_legacy_password_is_upgraded_on_login(pool: PgPool) {
    let app = TestApp::new(pool);
    let id = app
        .customer_with_stored_password("old@example.com", "plain-secret")
        .await;

    let (status, _) = app
        .post(
            "/login",
            json!({"email": "old@example.com", "password": "plain-secret"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.stored_password(id).await.starts_with("$argon2"));

    // Still works against the new hash.
    let (status, _) = app
        .post(
            "/login",
            json!({"email": "old@example.com", "password": "plain-secret"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_bcrypt_password_is_upgraded_on_login(pool: PgPool) {
    let app = TestApp::new(pool);
    let stored = bcrypt::hash("bcrypt-secret", 4).unwrap();
    let id = app
        .customer_with_stored_password("bcrypt@example.com", &stored)
        .await;

    let (status, _) = app
        .post(
            "/login",
            json!({"email": "bcrypt@example.com", "password": "wrong-secret"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.stored_password(id).await, stored);

    let (status, body) = app
        .post(
            "/login",
            json!({"email": "bcrypt@example.com", "password": "bcrypt-secret"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer_id"], id.as_i32());
    assert!(app.stored_password(id).await.starts_with("$argon2"));
}

// ============================================================================
// Listing
// ============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_list_customers_ordered_by_id(pool: PgPool) {
    let app = TestApp::new(pool);
    let first = app.customer("a@example.com", "password-a").await;
    let second = app.customer("b@example.com", "password-b").await;

    let (status, body) = app.get("/login").await;

    assert_eq!(status, StatusCode::OK);
    let customers = body.as_array().unwrap();
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0]["customer_id"], first.as_i32());
    assert_eq!(customers[1]["customer_id"], second.as_i32());
    assert!(customers.iter().all(|c| c.get("password").is_none()));
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_list_customers_keeps_malformed_email(pool: PgPool) {
    let app = TestApp::new(pool);
    let good = app.customer("a@example.com", "password-a").await;
    let odd = app.customer("b@example.com", "password-b").await;
    app.set_raw_email(odd, "john.doe").await;

    let (status, body) = app.get("/login").await;

    assert_eq!(status, StatusCode::OK);
    let customers = body.as_array().unwrap();
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0]["customer_id"], good.as_i32());
    assert_eq!(customers[1]["email"], "john.doe");

    let (status, _) = app
        .put(
            &format!("/customer/{odd}/address"),
            json!({"new_address": "5 New Road"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Address
// ============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_update_address(pool: PgPool) {
    let app = TestApp::new(pool);
    let id = app.customer("malee@example.com", "correct-horse").await;

    let (status, body) = app
        .put(
            &format!("/customer/{id}/address"),
            json!({"new_address": "5 Sukhumvit Rd, Bangkok"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Address updated successfully");
    assert_eq!(body["customer"]["address"], "5 Sukhumvit Rd, Bangkok");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_update_address_unknown_customer(pool: PgPool) {
    let app = TestApp::new(pool);

    let (status, body) = app
        .put("/customer/4242/address", json!({"new_address": "Nowhere"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");
    assert_eq!(body["details"], "No customer found with the given ID");
}

// ============================================================================
// Password
// ============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_change_password(pool: PgPool) {
    let app = TestApp::new(pool);
    let id = app.customer("malee@example.com", "correct-horse").await;

    let (status, body) = app
        .put(
            &format!("/customer/{id}/password"),
            json!({"old_password": "correct-horse", "new_password": "battery-staple"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully");

    let (status, _) = app
        .post(
            "/login",
            json!({"email": "malee@example.com", "password": "battery-staple"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            "/login",
            json!({"email": "malee@example.com", "password": "correct-horse"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_change_password_rejections(pool: PgPool) {
    let app = TestApp::new(pool);
    let id = app.customer("malee@example.com", "correct-horse").await;
    let uri = format!("/customer/{id}/password");

    let (status, body) = app
        .put(
            &uri,
            json!({"old_password": "not-it", "new_password": "battery-staple"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid old password");
    assert_eq!(body["details"], "Old password does not match");

    let (status, _) = app
        .put(
            &uri,
            json!({"old_password": "correct-horse", "new_password": "short"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(
            "/customer/4242/password",
            json!({"old_password": "a", "new_password": "battery-staple"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");
}
