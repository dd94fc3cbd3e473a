use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    dto::test_dto::{ApplyTestPayload, CreateTestModelPayload, SaveAnswerPayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/theoretical-test/models",
    request_body = CreateTestModelPayload,
    responses(
        (status = 201, description = "Model created"),
        (status = 400, description = "Invalid questions")
    )
)]
#[axum::debug_handler]
pub async fn create_model(
    State(state): State<AppState>,
    Json(payload): Json<CreateTestModelPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let model = state.theoretical_service.create_model(payload).await?;
    Ok((StatusCode::CREATED, Json(model)))
}

#[utoipa::path(
    get,
    path = "/api/theoretical-test/models",
    responses((status = 200, description = "Test models"))
)]
#[axum::debug_handler]
pub async fn list_models(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let models = state.theoretical_service.list_models().await?;
    Ok(Json(models))
}

#[derive(Debug, Deserialize)]
pub struct SetActivePayload {
    pub active: bool,
}

#[utoipa::path(
    patch,
    path = "/api/theoretical-test/models/{id}",
    params(("id" = i64, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Model updated"),
        (status = 404, description = "Model not found")
    )
)]
#[axum::debug_handler]
pub async fn set_model_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SetActivePayload>,
) -> Result<impl IntoResponse> {
    let model = state
        .theoretical_service
        .set_model_active(id, payload.active)
        .await?;
    Ok(Json(model))
}

#[utoipa::path(
    post,
    path = "/api/theoretical-test/apply",
    request_body = ApplyTestPayload,
    responses(
        (status = 201, description = "Test applied to candidate"),
        (status = 400, description = "Model inactive"),
        (status = 404, description = "Model not found")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Json(payload): Json<ApplyTestPayload>,
) -> Result<impl IntoResponse> {
    let applied = state
        .theoretical_service
        .apply(payload.model_id, payload.candidate_id, payload.deadline)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": applied.id, "token": applied.token, "deadline": applied.deadline })),
    ))
}

/// Participant view: questions with grading keys stripped.
#[utoipa::path(
    get,
    path = "/api/theoretical-test/{token}",
    params(("token" = String, Path, description = "Opaque test link token")),
    responses(
        (status = 200, description = "Questions and saved answers"),
        (status = 404, description = "Link not found"),
        (status = 409, description = "Already answered")
    )
)]
#[axum::debug_handler]
pub async fn get_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse> {
    let (applied, questions, time_limit) =
        state.theoretical_service.participant_view(&token).await?;
    Ok(Json(json!({
        "token": applied.token,
        "deadline": applied.deadline,
        "time_limit_minutes": time_limit,
        "questions": questions,
        "answers": applied.answers,
    })))
}

#[utoipa::path(
    patch,
    path = "/api/theoretical-test/{token}/answer",
    params(("token" = String, Path, description = "Opaque test link token")),
    request_body = SaveAnswerPayload,
    responses(
        (status = 200, description = "Answer saved"),
        (status = 409, description = "Already answered")
    )
)]
#[axum::debug_handler]
pub async fn save_answer(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<SaveAnswerPayload>,
) -> Result<impl IntoResponse> {
    let applied = state
        .theoretical_service
        .save_answer(&token, payload.question_index, payload.answer)
        .await?;
    Ok(Json(json!({ "answers": applied.answers })))
}

#[utoipa::path(
    post,
    path = "/api/theoretical-test/{token}/submit",
    params(("token" = String, Path, description = "Opaque test link token")),
    responses(
        (status = 200, description = "Submitted and scored"),
        (status = 400, description = "Unanswered questions or deadline passed"),
        (status = 409, description = "Already answered")
    )
)]
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse> {
    let applied = state.theoretical_service.submit(&token).await?;
    Ok(Json(json!({
        "id": applied.id,
        "submitted_at": applied.submitted_at,
        "score": applied.score,
    })))
}
