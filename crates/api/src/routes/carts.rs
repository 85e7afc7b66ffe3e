//! Cart route handlers.
//!
//! Carts are named per customer; adding a product to a cart name that does not
//! exist yet creates that cart.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use corner_shop_core::{CartId, CartItemId, CustomerId, Price, ProductId, Quantity};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, CustomerPath};
use crate::models::{CartContents, CartLine, format_timestamp};
use crate::services::{AddToCart, CartService};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// One cart line as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub cart_item_id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub description: String,
    pub price: Price,
    pub quantity: Quantity,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            cart_item_id: line.item_id,
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            description: line.description.clone(),
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// A cart with its items as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub cart_id: CartId,
    pub cart_name: String,
    pub created_at: String,
    pub updated_at: String,
    pub items: Vec<CartItemView>,
}

impl From<&CartContents> for CartView {
    fn from(contents: &CartContents) -> Self {
        Self {
            cart_id: contents.cart.id,
            cart_name: contents.cart.name.clone(),
            created_at: format_timestamp(&contents.cart.created_at),
            updated_at: format_timestamp(&contents.cart.updated_at),
            items: contents.lines.iter().map(CartItemView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartsResponse {
    pub status: &'static str,
    pub carts: Vec<CartView>,
}

#[derive(Debug, Serialize)]
pub struct AddedToCart {
    pub message: &'static str,
    pub cart_id: CartId,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub cart_name: String,
}

impl TryFrom<AddToCartRequest> for AddToCart {
    type Error = AppError;

    fn try_from(request: AddToCartRequest) -> Result<Self> {
        let quantity = Quantity::new(request.quantity)
            .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

        let cart_name = request.cart_name.trim();
        if cart_name.is_empty() {
            return Err(AppError::InvalidRequest(
                "cart_name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            customer_id: request.customer_id,
            product_id: request.product_id,
            quantity,
            cart_name: cart_name.to_string(),
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /products/cart` - add a product to a named cart.
#[instrument(skip(state, request))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddToCartRequest>,
) -> Result<Json<AddedToCart>> {
    let request = AddToCart::try_from(request)?;
    let cart_id = CartService::new(state.pool()).add_product(&request).await?;

    Ok(Json(AddedToCart {
        message: "Product added to cart successfully",
        cart_id,
    }))
}

/// `GET /customer/{id}/carts` - every cart the customer owns, with items.
#[instrument(skip(state), fields(customer_id = %customer_id))]
pub async fn list_customer_carts(
    State(state): State<AppState>,
    CustomerPath(customer_id): CustomerPath,
) -> Result<Json<CartsResponse>> {
    let carts = CartService::new(state.pool())
        .list_for_customer(customer_id)
        .await?;

    Ok(Json(CartsResponse {
        status: "success",
        carts: carts.iter().map(CartView::from).collect(),
    }))
}
