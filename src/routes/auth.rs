use axum::{extract::State, http::StatusCode, response::Response, Extension, Json};
use serde_json::json;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest, UserSummary};
use crate::response;
use crate::services::auth_service::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let user = state.auth_service.register(payload).await?;
    Ok(response::success(
        StatusCode::CREATED,
        "User registered successfully",
        UserSummary::from(&user),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let (token, user) = state.auth_service.login(payload).await?;
    Ok(response::success(
        StatusCode::OK,
        "Login successful",
        LoginResponse {
            token,
            user: UserSummary::from(&user),
        },
    ))
}

#[axum::debug_handler]
pub async fn me(Extension(claims): Extension<Claims>) -> crate::error::Result<Response> {
    Ok(response::success(
        StatusCode::OK,
        "User info retrieved",
        json!({
            "id": claims.user_id,
            "username": claims.username,
            "email": claims.email,
        }),
    ))
}
