use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{Error, Result},
    pipeline::status::CandidateStatus,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct WhatsAppQuery {
    /// Wire label of the status the message is templated for; defaults to
    /// the candidate's current pipeline state.
    pub status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}/whatsapp",
    params(("id" = i64, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "WhatsApp deep link and message"),
        (status = 400, description = "Candidate has no phone number")
    )
)]
#[axum::debug_handler]
pub async fn whatsapp_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<WhatsAppQuery>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get(id).await?;
    let status = match query.status {
        Some(raw) => {
            CandidateStatus::from_wire(&raw).map_err(|e| Error::BadRequest(e.to_string()))?
        }
        None => candidate.effective_status(),
    };
    let link = state.message_service.whatsapp_link(&candidate, status)?;
    let message = state.message_service.template_for(&candidate, status);
    Ok(Json(json!({ "link": link, "message": message })))
}
