//! Customer route handlers: listing, login, address and password changes.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use corner_shop_core::CustomerId;

use crate::db::RepositoryError;
use crate::db::customers::CustomerRepository;
use crate::error::{AppError, Result, set_sentry_user};
use crate::extract::{ApiJson, CustomerPath};
use crate::models::{Customer, format_timestamp};
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Customer as returned by the API. Never carries the password.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerView {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Customer> for CustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            phone_number: customer.phone_number.clone(),
            address: customer.address.clone(),
            created_at: format_timestamp(&customer.created_at),
            updated_at: format_timestamp(&customer.updated_at),
        }
    }
}

/// Plain confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Body returned after an address change.
#[derive(Debug, Serialize)]
pub struct AddressUpdated {
    pub message: &'static str,
    pub customer: CustomerView,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAddressRequest {
    pub new_address: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /login` - every customer, ordered by ID.
#[instrument(skip(state))]
pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<CustomerView>>> {
    let customers = CustomerRepository::new(state.pool()).list_all().await?;
    Ok(Json(customers.iter().map(CustomerView::from).collect()))
}

/// `POST /login` - verify email and password.
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<CustomerView>> {
    let auth = AuthService::new(state.pool(), state.config().min_password_length);
    let customer = auth.login(&request.email, &request.password).await?;

    set_sentry_user(&customer.id, Some(customer.email.as_str()));
    info!(customer_id = %customer.id, "customer logged in");

    Ok(Json(CustomerView::from(&customer)))
}

/// `PUT /customer/{id}/address` - replace the delivery address.
#[instrument(skip(state, request), fields(customer_id = %customer_id))]
pub async fn update_address(
    State(state): State<AppState>,
    CustomerPath(customer_id): CustomerPath,
    ApiJson(request): ApiJson<UpdateAddressRequest>,
) -> Result<Json<AddressUpdated>> {
    let address = request.new_address.trim();
    if address.is_empty() {
        return Err(AppError::InvalidRequest(
            "new_address must not be empty".to_string(),
        ));
    }

    let customer = CustomerRepository::new(state.pool())
        .update_address(customer_id, address)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::CustomerNotFound,
            other => AppError::Database(other),
        })?;

    Ok(Json(AddressUpdated {
        message: "Address updated successfully",
        customer: CustomerView::from(&customer),
    }))
}

/// `PUT /customer/{id}/password` - change the password after checking the old one.
#[instrument(skip(state, request), fields(customer_id = %customer_id))]
pub async fn change_password(
    State(state): State<AppState>,
    CustomerPath(customer_id): CustomerPath,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.pool(), state.config().min_password_length)
        .change_password(customer_id, &request.old_password, &request.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}
