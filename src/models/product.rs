use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Catalog entry as the rest of the crate sees it. The price is a decimal
/// in the store and only becomes a float at the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
    pub created_at: chrono::NaiveDateTime,
}

/// Validated fields for an insert or overwrite.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<f64>,
}

impl ProductPayload {
    /// Checks request shape before anything reaches the store.
    pub fn validate(self) -> Result<ProductDraft, AppError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                AppError::Validation("Name is required and must be a valid string".to_string())
            })?
            .to_string();

        let price = self
            .price
            .filter(|p| p.is_finite() && *p > 0.0)
            .and_then(Decimal::from_f64)
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| {
                AppError::Validation(
                    "Price is required and must be a positive number".to_string(),
                )
            })?;

        let stock = self
            .stock
            .filter(|s| s.is_finite() && *s >= 0.0 && s.fract() == 0.0)
            .map(|s| s as i64)
            .ok_or_else(|| {
                AppError::Validation(
                    "Stock is required and must be a non-negative integer".to_string(),
                )
            })?;

        Ok(ProductDraft { name, price, stock })
    }
}

/// Transport form of a product. The decimal price is converted to a JSON
/// number here; for very large catalog values this is a precision-loss
/// point, accepted as part of the API contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub created_at: String,
}

impl From<Product> for ProductBody {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price.to_f64().unwrap_or_default(),
            stock: product.stock,
            created_at: DateTime::<Utc>::from_naive_utc_and_offset(product.created_at, Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchBody {
    pub products: Vec<ProductBody>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}
