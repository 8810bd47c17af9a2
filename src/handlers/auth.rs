use axum::extract::State;
use axum::http::header::{HeaderMap, SET_COOKIE};
use axum::response::{AppendHeaders, IntoResponse, Json};
use serde_json::json;

use crate::errors::ServiceError;
use crate::services::auth::LoginRequest;
use crate::{ApiResponse, AppState};

const SESSION_COOKIE: &str = "admin_session";

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Back-office login; opens a session and sets an httpOnly cookie
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (token, session) = state.services.auth.login(request).await?;

    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, state.config.session_ttl_secs
    );
    if state.config.is_production() {
        cookie.push_str("; Secure");
    }

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(ApiResponse::success_with_message(
            session,
            "Login successful".to_string(),
        )),
    ))
}

/// Check whether the caller holds a live session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session is live"),
        (status = 401, description = "No session or expired")
    ),
    tag = "auth"
)]
pub async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    let info = session_token(&headers)
        .and_then(|token| state.services.auth.session(&token))
        .ok_or_else(|| ServiceError::Unauthorized("Not authenticated".to_string()))?;

    Ok(Json(ApiResponse::success(json!({
        "authenticated": true,
        "username": info.username,
        "lastLogin": info.last_login,
    }))))
}

/// Close the session and expire the cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logout successful")),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServiceError> {
    if let Some(token) = session_token(&headers) {
        state.services.auth.logout(&token);
    }

    let cookie = format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(ApiResponse::success_with_message(
            (),
            "Logout successful".to_string(),
        )),
    ))
}
