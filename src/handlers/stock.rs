use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::stock_item;
use crate::errors::ServiceError;
use crate::services::stock::{CreateStockItemRequest, StockStats, UpdateStockItemRequest};
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct StockListResponse {
    pub items: Vec<stock_item::Model>,
    pub stats: StockStats,
}

/// List stock items, problem items first, with header stats
#[utoipa::path(
    get,
    path = "/api/stock",
    responses((status = 200, description = "Stock items and stats")),
    tag = "stock"
)]
pub async fn list_stock(State(state): State<AppState>) -> ApiResult<StockListResponse> {
    let (items, stats) = state.services.stock.list().await?;
    Ok(Json(ApiResponse::success(StockListResponse { items, stats })))
}

/// Add a stock item
#[utoipa::path(
    post,
    path = "/api/stock",
    request_body = CreateStockItemRequest,
    responses(
        (status = 201, description = "Stock item created"),
        (status = 400, description = "Missing name or unit")
    ),
    tag = "stock"
)]
pub async fn create_stock_item(
    State(state): State<AppState>,
    Json(request): Json<CreateStockItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.stock.create(request).await?;
    let message = format!("Stock item \"{}\" created", item.name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(item, message)),
    ))
}

/// Update a stock item; a stock change re-derives the status
#[utoipa::path(
    patch,
    path = "/api/stock/{id}",
    params(("id" = Uuid, Path, description = "Stock item id")),
    request_body = UpdateStockItemRequest,
    responses(
        (status = 200, description = "Stock item updated"),
        (status = 404, description = "Unknown stock item")
    ),
    tag = "stock"
)]
pub async fn update_stock_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStockItemRequest>,
) -> ApiResult<stock_item::Model> {
    let item = state.services.stock.update(id, request).await?;
    let message = format!("Stock item \"{}\" updated", item.name);
    Ok(Json(ApiResponse::success_with_message(item, message)))
}

/// Remove a stock item
#[utoipa::path(
    delete,
    path = "/api/stock/{id}",
    params(("id" = Uuid, Path, description = "Stock item id")),
    responses(
        (status = 200, description = "Stock item deleted"),
        (status = 404, description = "Unknown stock item")
    ),
    tag = "stock"
)]
pub async fn delete_stock_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let name = state.services.stock.delete(id).await?;
    let message = format!("Stock item \"{}\" deleted", name);
    Ok(Json(ApiResponse::success_with_message((), message)))
}
