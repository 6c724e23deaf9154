//! Order route handlers.
//!
//! Every route is scoped to the authenticated owner, including the status
//! update.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use copperleaf_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::order::Order;
use crate::services::orders::{OrderDraft, OrderService};
use crate::state::AppState;

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Deletion confirmation, echoing the removed order.
#[derive(Debug, Serialize)]
pub struct DeletedOrderResponse {
    pub message: &'static str,
    pub order: Order,
}

/// Create an order from the client's basket snapshot.
///
/// POST /api/orders
#[instrument(skip(state, user, draft), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(draft): Json<OrderDraft>,
) -> Result<impl IntoResponse> {
    let order = OrderService::new(state.pool()).create(user.id, draft).await?;
    tracing::info!(order_id = %order.id, total = %order.total, "order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// List the caller's orders, newest first.
///
/// GET /api/orders/my-orders
pub async fn my_orders(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool()).list_mine(user.id).await?;
    Ok(Json(orders))
}

/// A single order, owner-scoped.
///
/// GET /api/orders/{id}
pub async fn show(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.pool()).get(id, user.id).await?;
    Ok(Json(order))
}

/// Advance the order's status along the fulfillment sequence.
///
/// PATCH /api/orders/{id}/status
#[instrument(skip(state, user, req), fields(user_id = %user.id, order_id = %id))]
pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let status: OrderStatus = req
        .status
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| {
            AppError::BadRequest(
                "status must be one of pending, processing, shipped, delivered, cancelled"
                    .to_owned(),
            )
        })?;

    let order = OrderService::new(state.pool())
        .update_status(id, user.id, status)
        .await?;
    Ok(Json(order))
}

/// Delete an order, owner-scoped.
///
/// DELETE /api/orders/{id}
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<DeletedOrderResponse>> {
    let service = OrderService::new(state.pool());
    let order = service.get(id, user.id).await?;
    service.delete(id, user.id).await?;

    Ok(Json(DeletedOrderResponse {
        message: "Order deleted successfully",
        order,
    }))
}
