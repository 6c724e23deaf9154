//! Catalog route handlers.
//!
//! Public, read-only views over the product table.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use copperleaf_core::{Category, ProductId};

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::Product;
use crate::state::AppState;

/// Listing filters.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
}

/// List products, optionally filtered.
///
/// GET /api/products
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let category = query
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let products = ProductRepository::new(state.pool())
        .list(category, query.featured)
        .await?;
    Ok(Json(products))
}

/// A single product.
///
/// GET /api/products/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;
    Ok(Json(product))
}
