//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every error body has the JSON shape
//! `{"error": "...", "details": "..."}` (`details` omitted when empty).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CartError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Request body could not be parsed or failed validation.
    #[error("Invalid request format: {0}")]
    InvalidRequest(String),

    /// Query string could not be parsed or failed validation.
    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),

    /// Customer ID path segment is not a number.
    #[error("Invalid customer ID: {0}")]
    InvalidCustomerId(String),

    /// Customer does not exist.
    #[error("Customer not found")]
    CustomerNotFound,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new(error: &str, details: Option<String>) -> Self {
        Self {
            error: error.to_string(),
            details,
        }
    }
}

const CUSTOMER_NOT_FOUND_DETAILS: &str = "No customer found with the given ID";

impl AppError {
    /// Whether this error is the server's fault (and should be reported).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
                | Self::Cart(CartError::Repository(_))
        )
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::OldPasswordMismatch => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::CustomerNotFound => StatusCode::NOT_FOUND,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Cart(err) => match err {
                CartError::CustomerNotFound | CartError::ProductNotFound => StatusCode::NOT_FOUND,
                CartError::InsufficientStock | CartError::InsufficientStockForUpdate => {
                    StatusCode::BAD_REQUEST
                }
                CartError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InvalidRequest(_) | Self::InvalidQuery(_) | Self::InvalidCustomerId(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::CustomerNotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Client-facing body. Internal details are never exposed.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::Database(_) => ErrorBody::new("Internal server error", None),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => ErrorBody::new("Invalid credentials", None),
                AuthError::OldPasswordMismatch => ErrorBody::new(
                    "Invalid old password",
                    Some("Old password does not match".to_string()),
                ),
                AuthError::InvalidEmail(e) => {
                    ErrorBody::new("Invalid request format", Some(e.to_string()))
                }
                AuthError::WeakPassword(msg) => {
                    ErrorBody::new("Invalid new password", Some(msg.clone()))
                }
                AuthError::CustomerNotFound => ErrorBody::new(
                    "Customer not found",
                    Some(CUSTOMER_NOT_FOUND_DETAILS.to_string()),
                ),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    ErrorBody::new("Internal server error", None)
                }
            },
            Self::Cart(err) => match err {
                CartError::CustomerNotFound => ErrorBody::new("Customer not found", None),
                CartError::ProductNotFound => ErrorBody::new("Product not found", None),
                CartError::InsufficientStock => ErrorBody::new("Insufficient stock", None),
                CartError::InsufficientStockForUpdate => {
                    ErrorBody::new("Insufficient stock for updated quantity", None)
                }
                CartError::Repository(_) => ErrorBody::new("Internal server error", None),
            },
            Self::InvalidRequest(details) => {
                ErrorBody::new("Invalid request format", Some(details.clone()))
            }
            Self::InvalidQuery(details) => {
                ErrorBody::new("Invalid query parameters", Some(details.clone()))
            }
            Self::InvalidCustomerId(details) => {
                ErrorBody::new("Invalid customer ID", Some(details.clone()))
            }
            Self::CustomerNotFound => ErrorBody::new(
                "Customer not found",
                Some(CUSTOMER_NOT_FOUND_DETAILS.to_string()),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (self.status(), Json(self.body())).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the customer being acted on.
pub fn set_sentry_user(customer_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
