use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::quiz_dto::{
    AddQuestionRequest, CreateQuizRequest, JoinQuizRequest, SubmitAnswerRequest,
};
use crate::response;
use crate::services::auth_service::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuizRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let quiz = state
        .quiz_service
        .create_quiz(payload, claims.user_id)
        .await?;
    Ok(response::success(StatusCode::CREATED, "Quiz created", quiz))
}

#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let quiz = state.quiz_service.get_quiz(id).await?;
    Ok(response::success(
        StatusCode::OK,
        "Quiz info retrieved",
        quiz,
    ))
}

#[axum::debug_handler]
pub async fn add_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddQuestionRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let question = state.quiz_service.add_question(id, payload).await?;
    Ok(response::success(
        StatusCode::CREATED,
        "Question added",
        question,
    ))
}

#[axum::debug_handler]
pub async fn join_quiz(
    State(state): State<AppState>,
    Json(payload): Json<JoinQuizRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let quiz = state.quiz_service.join_quiz(&payload.code).await?;
    Ok(response::success(
        StatusCode::OK,
        "Joined quiz successfully",
        quiz,
    ))
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let answer = state
        .quiz_service
        .submit_answer(id, claims.user_id, payload)
        .await?;
    Ok(response::success(
        StatusCode::CREATED,
        "Answer submitted",
        answer,
    ))
}

#[axum::debug_handler]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let leaderboard = state.quiz_service.get_leaderboard(id).await?;
    Ok(response::success(
        StatusCode::OK,
        "Leaderboard retrieved",
        leaderboard,
    ))
}
