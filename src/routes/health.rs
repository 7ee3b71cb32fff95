use axum::{http::StatusCode, response::Response};
use serde_json::json;

use crate::response;

#[axum::debug_handler]
pub async fn health() -> Response {
    response::success(StatusCode::OK, "Service healthy", json!({ "status": "ok" }))
}
