use axum::extract::State;
use axum::response::Json;

use crate::entities::store_settings;
use crate::services::settings::UpdateSettingsRequest;
use crate::{ApiResponse, ApiResult, AppState};

/// Store settings (seeded with defaults on first read)
#[utoipa::path(
    get,
    path = "/api/settings",
    responses((status = 200, description = "Current settings")),
    tag = "settings"
)]
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<store_settings::Model> {
    let settings = state.services.settings.get_or_create().await?;
    Ok(Json(ApiResponse::success(settings)))
}

/// Partial settings update
#[utoipa::path(
    patch,
    path = "/api/settings",
    request_body = UpdateSettingsRequest,
    responses((status = 200, description = "Settings updated")),
    tag = "settings"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> ApiResult<store_settings::Model> {
    let settings = state.services.settings.update(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        settings,
        "Settings updated successfully".to_string(),
    )))
}
