use axum::extract::{Query, State};
use axum::response::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::ServiceError;
use crate::services::revenue::RevenueSummary;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    /// Local calendar day `YYYY-MM-DD`; defaults to today.
    pub date: Option<String>,
}

/// Daily revenue summary
#[utoipa::path(
    get,
    path = "/api/revenue",
    params(("date" = Option<String>, Query, description = "Day to report on (YYYY-MM-DD), default today")),
    responses(
        (status = 200, description = "Revenue summary for the day"),
        (status = 400, description = "Unparseable date")
    ),
    tag = "revenue"
)]
pub async fn daily_revenue(
    State(state): State<AppState>,
    Query(query): Query<RevenueQuery>,
) -> ApiResult<RevenueSummary> {
    let date = match query.date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
            ServiceError::ValidationError(format!("Invalid date, expected YYYY-MM-DD: {}", raw))
        })?,
        None => crate::services::today_local(),
    };

    let summary = state.services.revenue.daily_summary(date).await?;
    Ok(Json(ApiResponse::success(summary)))
}
