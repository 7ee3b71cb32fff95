use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::response;
use crate::AppState;

/// Rejects the request unless it carries a valid `Authorization: Bearer`
/// token; on success the decoded claims are attached to the request
/// extensions for the handlers.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return response::error(StatusCode::UNAUTHORIZED, "missing authorization header");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return response::error(StatusCode::UNAUTHORIZED, "bad authorization header");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return response::error(StatusCode::UNAUTHORIZED, "unsupported authorization scheme");
    };

    match state.auth_service.validate_token(token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(_) => response::error(StatusCode::UNAUTHORIZED, "invalid or expired token"),
    }
}
