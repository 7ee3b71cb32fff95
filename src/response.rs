//! Response envelope shared by every JSON endpoint: `{data, message, error}`
//! with absent fields omitted.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    let body = ApiResponse {
        data: Some(data),
        message: Some(message.to_string()),
        error: None,
    };
    (status, Json(body)).into_response()
}

pub fn error(status: StatusCode, message: &str) -> Response {
    let body = ApiResponse::<()> {
        data: None,
        message: None,
        error: Some(message.to_string()),
    };
    (status, Json(body)).into_response()
}
