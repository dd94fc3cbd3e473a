use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::user_dto::{UpdatePasswordPayload, UpdateProfilePayload},
    error::{Error, Result},
    models::user::Profile,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = Json<Profile>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get(id).await?;
    Ok(Json(Profile::from(user)))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}/profile",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Profile updated", body = Json<Profile>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let profile = state.user_service.update_profile(id, payload).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}/password",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdatePasswordPayload,
    responses(
        (status = 204, description = "Password updated"),
        (status = 400, description = "Password too short")
    )
)]
#[axum::debug_handler]
pub async fn update_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePasswordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .user_service
        .update_password(id, &payload.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Multipart avatar upload, relayed to the row store's file endpoint.
/// Expects a `user_id` text field and an `avatar` file field.
#[axum::debug_handler]
pub async fn upload_avatar(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut user_id: Option<i64> = None;
    let mut file: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "user_id" => {
                let raw = field.text().await.unwrap_or_default();
                user_id = raw.parse().ok();
            }
            "avatar" => {
                let filename = field.file_name().unwrap_or("avatar.bin").to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    file = Some((filename, data));
                }
            }
            _ => {}
        }
    }

    let user_id =
        user_id.ok_or_else(|| Error::BadRequest("user_id field is required".to_string()))?;
    let (filename, data) =
        file.ok_or_else(|| Error::BadRequest("avatar file is required".to_string()))?;

    let profile = state.user_service.set_avatar(user_id, &filename, data).await?;
    Ok(Json(profile))
}
