//! Wishlist route handlers.
//!
//! All routes require the bearer credential and return the hydrated wishlist.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use copperleaf_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::services::wishlist::{WishlistService, WishlistView};
use crate::state::AppState;

/// Add-product request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    #[serde(default)]
    pub product_id: Option<ProductId>,
}

/// Fetch the wishlist, creating an empty one if none exists.
///
/// GET /api/wishlist
pub async fn show(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WishlistView>> {
    let wishlist = WishlistService::new(state.pool()).fetch(user.id).await?;
    Ok(Json(wishlist))
}

/// Save a product; a duplicate add is rejected and changes nothing.
///
/// POST /api/wishlist
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<AddProductRequest>,
) -> Result<Json<WishlistView>> {
    let product_id = req
        .product_id
        .ok_or_else(|| AppError::BadRequest("productId is required".to_owned()))?;

    let wishlist = WishlistService::new(state.pool())
        .add(user.id, product_id)
        .await?;
    Ok(Json(wishlist))
}

/// Remove a product; succeeds even when it is not saved.
///
/// DELETE /api/wishlist/{productId}
pub async fn remove_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<WishlistView>> {
    let wishlist = WishlistService::new(state.pool())
        .remove(user.id, product_id)
        .await?;
    Ok(Json(wishlist))
}

/// Empty the wishlist.
///
/// DELETE /api/wishlist
pub async fn clear(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WishlistView>> {
    let wishlist = WishlistService::new(state.pool()).clear(user.id).await?;
    Ok(Json(wishlist))
}
