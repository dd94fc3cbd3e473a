use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    dto::candidate_dto::{
        CreateCandidatePayload, UpdateCandidatePayload, UpdateContactPayload, UpdateStatusPayload,
    },
    error::{Error, Result},
    models::candidate::Candidate,
    pipeline::filter::TalentFilter,
    pipeline::sort::{sort_candidates, SortColumn, SortDirection, SortState},
    pipeline::status::CandidateStatus,
    pipeline::transition::{plan, TransitionPlan, TransitionRequest},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct CandidateListQuery {
    pub job_id: Option<i64>,
    pub sort_by: Option<SortColumn>,
    pub direction: Option<SortDirection>,
}

#[utoipa::path(
    get,
    path = "/api/candidates",
    responses((status = 200, description = "Candidates", body = Json<Vec<Candidate>>))
)]
#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<impl IntoResponse> {
    let mut candidates = state.candidate_service.list(query.job_id).await?;
    if let Some(column) = query.sort_by {
        let sort = SortState {
            column,
            direction: query.direction.unwrap_or(SortDirection::Ascending),
        };
        sort_candidates(&mut candidates, sort);
    }
    Ok(Json(candidates))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(("id" = i64, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Candidate", body = Json<Candidate>),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get(id).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    post,
    path = "/api/candidates",
    request_body = CreateCandidatePayload,
    responses(
        (status = 201, description = "Candidate created", body = Json<Candidate>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<AppState>,
    Json(payload): Json<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state.candidate_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

#[utoipa::path(
    patch,
    path = "/api/candidates/{id}",
    params(("id" = i64, Path, description = "Candidate ID")),
    request_body = UpdateCandidatePayload,
    responses(
        (status = 200, description = "Candidate updated", body = Json<Candidate>),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state.candidate_service.update(id, payload).await?;
    Ok(Json(candidate))
}

/// Status transition endpoint for both drag-and-drop and the dropdown menu.
/// Entering Rejected requires a non-empty reason in the same request; status
/// and reason persist in one logical update.
#[utoipa::path(
    patch,
    path = "/api/candidates/{id}/status",
    params(("id" = i64, Path, description = "Candidate ID")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<Candidate>),
        (status = 400, description = "Unknown status or missing rejection reason"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let target = CandidateStatus::from_wire(&payload.status)
        .map_err(|e| Error::BadRequest(e.to_string()))?;
    let request = TransitionRequest {
        target,
        reason: payload.rejection_reason,
    };
    let candidate = match plan(&request).map_err(|e| Error::BadRequest(e.to_string()))? {
        TransitionPlan::Optimistic { target } => {
            state.candidate_service.update_status(id, target, None).await?
        }
        TransitionPlan::Deferred { target, reason } => {
            state
                .candidate_service
                .update_status(id, target, Some(reason))
                .await?
        }
    };
    Ok(Json(candidate))
}

#[utoipa::path(
    patch,
    path = "/api/candidates/{id}/contact-date",
    params(("id" = i64, Path, description = "Candidate ID")),
    request_body = UpdateContactPayload,
    responses((status = 200, description = "Contact date updated", body = Json<Candidate>))
)]
#[axum::debug_handler]
pub async fn update_contact_date(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateContactPayload>,
) -> Result<impl IntoResponse> {
    let candidate = state
        .candidate_service
        .update_last_contact(id, payload.last_contact)
        .await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    delete,
    path = "/api/candidates/{id}",
    params(("id" = i64, Path, description = "Candidate ID")),
    responses(
        (status = 204, description = "Candidate deleted"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.candidate_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Talent-database search: independent AND-combined predicates; empty
/// fields match all candidates.
#[utoipa::path(
    post,
    path = "/api/candidates/search",
    responses((status = 200, description = "Matching candidates", body = Json<Vec<Candidate>>))
)]
#[axum::debug_handler]
pub async fn search_candidates(
    State(state): State<AppState>,
    Json(filter): Json<TalentFilter>,
) -> Result<impl IntoResponse> {
    let candidates = state.candidate_service.list(None).await?;
    let jobs = state.job_service.list(None).await?;
    let hits: Vec<Candidate> = filter
        .apply(&candidates, &jobs)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(hits))
}

/// Interview-video upload, relayed to the row store. Expects a `video` file
/// field; bodies up to the 100 MB limit.
#[axum::debug_handler]
pub async fn upload_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut file: Option<(String, bytes::Bytes)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name().unwrap_or_default() == "video" {
            let filename = field.file_name().unwrap_or("interview.mp4").to_string();
            let data = field.bytes().await?;
            if !data.is_empty() {
                file = Some((filename, data));
            }
        }
    }
    let (filename, data) =
        file.ok_or_else(|| Error::BadRequest("video file is required".to_string()))?;
    let candidate = state
        .candidate_service
        .attach_video(id, &filename, data)
        .await?;
    Ok(Json(candidate))
}
