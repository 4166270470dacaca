use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    auth::AuthUser,
    error::AppError,
    extract::ValidJson,
    models::product::{Pagination, ProductBody, ProductPayload, SearchBody},
    AppState,
};

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation("Invalid product ID".to_string()))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductBody>>, AppError> {
    let products = state.products.all().await?;
    Ok(Json(products.into_iter().map(ProductBody::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn total_pages(total: i64, limit: u32) -> i64 {
    (total + i64::from(limit) - 1) / i64::from(limit)
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchBody>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).max(1);
    let skip = i64::from(page - 1) * i64::from(limit);

    let term = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let (products, total) = state.products.search(term, skip, i64::from(limit)).await?;

    Ok(Json(SearchBody {
        products: products.into_iter().map(ProductBody::from).collect(),
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        },
    }))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductBody>, AppError> {
    let id = parse_id(&id)?;
    let product = state
        .products
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(product.into()))
}

pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ProductPayload>,
) -> Result<(StatusCode, Json<ProductBody>), AppError> {
    let draft = payload.validate()?;
    let product = state.products.insert(&draft).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<ProductPayload>,
) -> Result<Json<ProductBody>, AppError> {
    let id = parse_id(&id)?;
    let draft = payload.validate()?;

    // Existence check first so a missing id is a 404, never a silent
    // create. The window to a concurrent delete is accepted.
    if state.products.get(id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let product = state
        .products
        .update(id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(product.into()))
}

pub async fn remove(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;

    if state.products.get(id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    state.products.delete(id).await?;

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(15, 10), 2);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn id_parsing() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("1.5").is_err());
    }
}
