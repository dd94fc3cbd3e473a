use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    dto::job_dto::{CreateJobPayload, UpdateJobPayload},
    error::Result,
    models::job::JobPosting,
    pipeline::board,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub owner: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses((status = 200, description = "Job postings", body = Json<Vec<JobPosting>>))
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list(query.owner).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = i64, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job posting", body = Json<JobPosting>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = Json<JobPosting>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    params(("id" = i64, Path, description = "Job ID")),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = Json<JobPosting>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(id, payload).await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = i64, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Kanban projection of one job's candidates: columns in canonical pipeline
/// order, statusless candidates in the Screening column.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/board",
    params(("id" = i64, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Kanban columns"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn job_board(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    // The 404 is distinct from a candidate-list failure on purpose.
    let _job = state.job_service.get(id).await?;
    let candidates = state.candidate_service.list(Some(id)).await?;
    Ok(Json(board::build_board(&candidates)))
}
