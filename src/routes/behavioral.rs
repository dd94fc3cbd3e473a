use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::test_dto::{BehavioralSubmitPayload, CompleteBehavioralPayload, CreateBehavioralLinkPayload},
    error::{Error, Result},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/behavioral-test/links",
    request_body = CreateBehavioralLinkPayload,
    responses((status = 201, description = "Test link created"))
)]
#[axum::debug_handler]
pub async fn create_link(
    State(state): State<AppState>,
    Json(payload): Json<CreateBehavioralLinkPayload>,
) -> Result<impl IntoResponse> {
    let result = state
        .behavioral_service
        .create_link(payload.candidate_id, payload.recruiter_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": result.id, "token": result.token })),
    ))
}

/// Participant view of a test link: invalid, expired, and already-answered
/// links each surface distinctly so the page can render a terminal state.
#[utoipa::path(
    get,
    path = "/api/behavioral-test/{token}",
    params(("token" = String, Path, description = "Opaque test link token")),
    responses(
        (status = 200, description = "Test state"),
        (status = 404, description = "Link not found"),
        (status = 409, description = "Already answered")
    )
)]
#[axum::debug_handler]
pub async fn get_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse> {
    let result = state.behavioral_service.get_by_token(&token).await?;
    if result.responded_at.is_some() {
        return Err(Error::AlreadyCompleted(
            "This test has already been answered".to_string(),
        ));
    }
    Ok(Json(json!({ "token": result.token, "status": result.status })))
}

#[utoipa::path(
    post,
    path = "/api/behavioral-test/{token}/submit",
    params(("token" = String, Path, description = "Opaque test link token")),
    request_body = BehavioralSubmitPayload,
    responses(
        (status = 200, description = "Responses accepted, scoring triggered"),
        (status = 400, description = "Below the selection threshold"),
        (status = 409, description = "Already answered")
    )
)]
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<BehavioralSubmitPayload>,
) -> Result<impl IntoResponse> {
    let result = state
        .behavioral_service
        .submit(&token, payload.responses)
        .await?;
    Ok(Json(json!({ "id": result.id, "status": result.status })))
}

/// Scoring-collaborator callback. The signature header must match the hex
/// HMAC-SHA256 of the raw body when a webhook secret is configured.
#[axum::debug_handler]
pub async fn complete(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse> {
    let signature = headers
        .get("X-Signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !state.behavioral_service.verify_signature(&body, signature) {
        return Err(Error::Unauthorized("Invalid webhook signature".to_string()));
    }

    let payload: CompleteBehavioralPayload = serde_json::from_str(&body)?;
    payload.validate()?;
    let result = state
        .behavioral_service
        .complete(
            &payload.token,
            payload.executor,
            payload.communicator,
            payload.planner,
            payload.analyst,
            payload.summary,
        )
        .await?;
    Ok(Json(json!({ "id": result.id, "status": result.status })))
}
