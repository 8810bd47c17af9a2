use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::OrderStatus;
use crate::services::orders::{
    CreateOrderRequest, EditOrderRequest, OrderListFilter, OrderResponse,
};
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
    #[serde(default)]
    pub today: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VoidOrderRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedOrder {
    pub id: Uuid,
    pub queue_number: String,
}

fn parse_status(raw: &str) -> Result<OrderStatus, ServiceError> {
    raw.parse().map_err(|_| {
        ServiceError::ValidationError(
            "Invalid status. Must be one of: PENDING, PREPARING, READY, COMPLETED, CANCELLED"
                .to_string(),
        )
    })
}

/// Create a new order
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created"),
        (status = 400, description = "Validation failure, empty cart, or store closed")
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.create_order(request).await?;
    let message = format!("Order created with queue number {}", order.queue_number);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(order, message)),
    ))
}

/// List orders, optionally filtered by status and/or today only
#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("status" = Option<String>, Query, description = "Filter by order status"),
        ("today" = Option<bool>, Query, description = "Restrict to today's orders")
    ),
    responses((status = 200, description = "Orders, newest first")),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<Vec<OrderResponse>> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let orders = state
        .services
        .orders
        .list_orders(OrderListFilter {
            status,
            today: query.today,
        })
        .await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// Get a single order with its items and drinks
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail"),
        (status = 404, description = "Unknown order")
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderResponse> {
    let order = state
        .services
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;
    Ok(Json(ApiResponse::success(order)))
}

/// Advance an order along the lifecycle
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Invalid status or illegal transition"),
        (status = 404, description = "Unknown order")
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<OrderResponse> {
    let new_status = parse_status(&request.status)?;
    let order = state.services.orders.update_status(id, new_status).await?;
    let message = format!(
        "Order {} status updated to {}",
        order.queue_number, new_status
    );
    Ok(Json(ApiResponse::success_with_message(order, message)))
}

/// Void an order with a recorded reason
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/void",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = VoidOrderRequest,
    responses(
        (status = 200, description = "Order voided"),
        (status = 400, description = "Already completed or already voided"),
        (status = 404, description = "Unknown order")
    ),
    tag = "orders"
)]
pub async fn void_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<VoidOrderRequest>,
) -> ApiResult<OrderResponse> {
    let order = state.services.orders.void_order(id, request.reason).await?;
    let message = format!("Pesanan {} berhasil dibatalkan", order.queue_number);
    Ok(Json(ApiResponse::success_with_message(order, message)))
}

/// Replace an order's items and drinks
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = EditOrderRequest,
    responses(
        (status = 200, description = "Order updated"),
        (status = 400, description = "Order already completed or cancelled"),
        (status = 404, description = "Unknown order")
    ),
    tag = "orders"
)]
pub async fn edit_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<EditOrderRequest>,
) -> ApiResult<OrderResponse> {
    let order = state.services.orders.edit_order(id, request).await?;
    let message = format!("Pesanan {} berhasil diupdate", order.queue_number);
    Ok(Json(ApiResponse::success_with_message(order, message)))
}

/// Hard-delete an order (admin reset tooling)
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 404, description = "Unknown order")
    ),
    tag = "orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<DeletedOrder> {
    let queue_number = state.services.orders.delete_order(id).await?;
    let message = format!("Order {} deleted", queue_number);
    Ok(Json(ApiResponse::success_with_message(
        DeletedOrder { id, queue_number },
        message,
    )))
}
