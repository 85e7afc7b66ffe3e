//! Product search route handler.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use corner_shop_core::{Price, ProductId};

use crate::db::products::{ProductFilter, ProductRepository};
use crate::error::{AppError, Result};
use crate::extract::ApiQuery;
use crate::models::{Product, format_timestamp};
use crate::state::AppState;

/// Product as returned by the API. `price` is a decimal string.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub product_id: ProductId,
    pub product_name: String,
    pub description: String,
    pub price: Price,
    pub stock_quantity: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock_quantity: product.stock_quantity,
            created_at: format_timestamp(&product.created_at),
            updated_at: format_timestamp(&product.updated_at),
        }
    }
}

/// Raw search query. Every parameter is optional and an empty value counts
/// as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ProductSearchQuery {
    pub product_name: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl ProductSearchQuery {
    /// Validate the query into a repository filter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidQuery` for unparseable or negative prices and
    /// for `min_price > max_price`.
    pub fn into_filter(self) -> Result<ProductFilter> {
        let min_price = parse_price("min_price", self.min_price)?;
        let max_price = parse_price("max_price", self.max_price)?;

        if let (Some(min), Some(max)) = (min_price, max_price)
            && min > max
        {
            return Err(AppError::InvalidQuery(
                "min_price must not exceed max_price".to_string(),
            ));
        }

        Ok(ProductFilter {
            name: self.product_name.filter(|name| !name.is_empty()),
            min_price,
            max_price,
        })
    }
}

/// Parse a price bound without rounding it.
fn parse_price(field: &str, raw: Option<String>) -> Result<Option<Decimal>> {
    let value = match raw.as_deref().map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };

    let bound = value
        .parse::<Decimal>()
        .map_err(|e| AppError::InvalidQuery(format!("{field}: {e}")))?;
    if bound < Decimal::ZERO {
        return Err(AppError::InvalidQuery(format!(
            "{field}: must not be negative"
        )));
    }

    Ok(Some(bound))
}

/// Search response body.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub status: &'static str,
    pub products: Vec<ProductView>,
}

/// `GET /products/search` - filter products by name and price range.
#[instrument(skip(state))]
pub async fn search_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductSearchQuery>,
) -> Result<Json<SearchResponse>> {
    let filter = query.into_filter()?;
    let products = ProductRepository::new(state.pool()).search(&filter).await?;

    tracing::debug!(count = products.len(), "product search");

    Ok(Json(SearchResponse {
        status: "success",
        products: products.iter().map(ProductView::from).collect(),
    }))
}
