use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use crate::{error::Result, AppState};

#[derive(Debug, Deserialize)]
pub struct ExecutePayload {
    pub job_id: i64,
    pub user_id: i64,
}

/// Triggers the external scoring collaborator and returns its ranked list
/// unchanged. The matching algorithm lives entirely on the collaborator.
#[utoipa::path(
    post,
    path = "/api/auto-match/execute",
    responses(
        (status = 200, description = "Ranked candidates"),
        (status = 502, description = "Scoring collaborator unavailable")
    )
)]
#[axum::debug_handler]
pub async fn execute(
    State(state): State<AppState>,
    Json(payload): Json<ExecutePayload>,
) -> Result<impl IntoResponse> {
    let ranked = state
        .automatch_service
        .execute(payload.job_id, payload.user_id)
        .await?;
    Ok(Json(ranked))
}
