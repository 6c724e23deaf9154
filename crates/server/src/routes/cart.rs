//! Cart route handlers.
//!
//! All routes require the bearer credential and return the hydrated cart.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use copperleaf_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::services::cart::{CartService, CartView};
use crate::state::AppState;

/// Add-item request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: Option<i64>,
}

/// Fetch the cart, creating an empty one if none exists.
///
/// GET /api/cart
pub async fn show(State(state): State<AppState>, user: CurrentUser) -> Result<Json<CartView>> {
    let cart = CartService::new(state.pool()).fetch(user.id).await?;
    Ok(Json(cart))
}

/// Add an item, merging with an existing line for the same product.
///
/// POST /api/cart
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let product_id = req
        .product_id
        .ok_or_else(|| AppError::BadRequest("productId is required".to_owned()))?;

    let cart = CartService::new(state.pool())
        .add_item(user.id, product_id, req.quantity)
        .await?;
    Ok(Json(cart))
}

/// Overwrite a line's quantity; 0 or below removes the line.
///
/// PUT /api/cart/{productId}
pub async fn update_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<ProductId>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let quantity = req
        .quantity
        .ok_or_else(|| AppError::BadRequest("quantity is required".to_owned()))?;

    let cart = CartService::new(state.pool())
        .update_quantity(user.id, product_id, quantity)
        .await?;
    Ok(Json(cart))
}

/// Remove a line; succeeds even when the product is not in the cart.
///
/// DELETE /api/cart/{productId}
pub async fn remove_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let cart = CartService::new(state.pool())
        .remove_item(user.id, product_id)
        .await?;
    Ok(Json(cart))
}

/// Empty the cart.
///
/// DELETE /api/cart
pub async fn clear(State(state): State<AppState>, user: CurrentUser) -> Result<Json<CartView>> {
    let cart = CartService::new(state.pool()).clear(user.id).await?;
    Ok(Json(cart))
}
