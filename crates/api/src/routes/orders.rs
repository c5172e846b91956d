//! Order route handlers.
//!
//! Basic and staff users work with their own orders; admin and manager
//! roles see everything and manage statuses.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use akubata_core::{OrderId, OrderStatus, PaymentMethod, Role};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderItemRequest, OrderWithItems};
use crate::services::orders::OrderService;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItemRequest>,
}

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<OrderWithItems>> {
    let order = OrderService::new(state.pool())
        .create(user.id, request.payment_method, &request.items)
        .await?;

    tracing::info!(
        order_id = %order.order.id,
        user_id = %user.id,
        total = %order.order.total_amount,
        "Order placed"
    );

    Ok(Json(order))
}

/// GET /api/orders
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderWithItems>>> {
    let orders = OrderService::new(state.pool())
        .list(user.id, user.role)
        .await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderWithItems>> {
    let order = OrderService::new(state.pool())
        .get(user.id, user.role, id)
        .await?;
    Ok(Json(order))
}

/// PUT /api/orders/{id}/status/{status}
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, status)): Path<(OrderId, String)>,
) -> Result<Json<Order>> {
    user.authorize(&[Role::Admin, Role::Manager])?;

    let status: OrderStatus = status.parse().map_err(AppError::BadRequest)?;

    let order = OrderService::new(state.pool())
        .update_status(id, status)
        .await?;

    tracing::info!(order_id = %id, status = %status, by = %user.id, "Order status updated");

    Ok(Json(order))
}

/// POST /api/orders/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
    Json(request): Json<OrderItemRequest>,
) -> Result<Json<OrderWithItems>> {
    let order = OrderService::new(state.pool())
        .add_item(user.id, user.role, id, &request)
        .await?;

    Ok(Json(order))
}

/// DELETE /api/orders/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    OrderService::new(state.pool())
        .delete(user.id, user.role, id)
        .await?;

    tracing::info!(order_id = %id, by = %user.id, "Order deleted, stock restored");

    Ok(Json(json!({ "message": "Order deleted" })))
}
