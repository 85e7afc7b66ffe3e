//! Request extractors that reject with the API's JSON error body.
//!
//! axum's stock `Json`, `Query` and `Path` extractors answer bad input with
//! plain-text bodies and assorted 4xx codes. The wrappers here map every
//! rejection to a `400` [`AppError`] instead.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use corner_shop_core::CustomerId;

use crate::error::AppError;

/// JSON body extractor. Any rejection becomes `400 Invalid request format`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string extractor. Any rejection becomes `400 Invalid query parameters`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::InvalidQuery(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// The `{id}` path segment of `/customer/{id}/...` routes.
///
/// A segment that is not an integer becomes `400 Invalid customer ID`.
#[derive(Debug, Clone, Copy)]
pub struct CustomerPath(pub CustomerId);

impl<S> FromRequestParts<S> for CustomerPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::InvalidCustomerId(rejection.body_text()))?;

        raw.parse::<CustomerId>()
            .map(Self)
            .map_err(|e| AppError::InvalidCustomerId(e.to_string()))
    }
}
