use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    dto::calendar_dto::{CreateEventPayload, EventListQuery, OAuthCallbackQuery},
    error::{Error, Result},
    services::calendar_service::EventInput,
    AppState,
};

/// Starts the OAuth consent flow; the user id rides in `state` so the
/// callback knows whose tokens arrived.
#[axum::debug_handler]
pub async fn auth_url(
    State(state): State<AppState>,
    Query(query): Query<AuthUrlQuery>,
) -> Result<impl IntoResponse> {
    let url = state
        .calendar_service
        .auth_url(&query.user_id.to_string());
    Ok(Json(json!({ "url": url })))
}

#[derive(Debug, Deserialize)]
pub struct AuthUrlQuery {
    pub user_id: i64,
}

#[axum::debug_handler]
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<impl IntoResponse> {
    let user_id: i64 = query
        .state
        .parse()
        .map_err(|_| Error::BadRequest("Invalid OAuth state".to_string()))?;
    let tokens = state.calendar_service.exchange_code(&query.code).await?;
    state
        .user_service
        .store_google_tokens(user_id, &tokens.access_token, tokens.refresh_token.as_deref())
        .await?;
    Ok(Json(json!({ "connected": true })))
}

/// Loads the connected user's access token, refreshing it once when the
/// stored one has expired.
async fn access_token_for(state: &AppState, user_id: i64) -> Result<String> {
    let user = state.user_service.get(user_id).await?;
    if let Some(token) = user.google_access_token.clone() {
        return Ok(token);
    }
    let refresh = user.google_refresh_token.ok_or_else(|| {
        Error::Unauthorized("Calendar is not connected for this user".to_string())
    })?;
    let tokens = state.calendar_service.refresh_access_token(&refresh).await?;
    state
        .user_service
        .store_google_tokens(user_id, &tokens.access_token, tokens.refresh_token.as_deref())
        .await?;
    Ok(tokens.access_token)
}

async fn with_refresh_retry<F, Fut, T>(state: &AppState, user_id: i64, call: F) -> Result<T>
where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let token = access_token_for(state, user_id).await?;
    retry_on_expiry(token, call, || async {
        let user = state.user_service.get(user_id).await?;
        let refresh = user.google_refresh_token.ok_or_else(|| {
            Error::Unauthorized("Calendar is not connected for this user".to_string())
        })?;
        let tokens = state.calendar_service.refresh_access_token(&refresh).await?;
        state
            .user_service
            .store_google_tokens(user_id, &tokens.access_token, tokens.refresh_token.as_deref())
            .await?;
        Ok(tokens.access_token)
    })
    .await
}

/// Runs the call once; on an expired-authorization failure refreshes the
/// token and retries exactly once. Any other failure propagates untouched.
async fn retry_on_expiry<F, Fut, R, RFut, T>(token: String, mut call: F, refresh: R) -> Result<T>
where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
    R: FnOnce() -> RFut,
    RFut: std::future::Future<Output = Result<String>>,
{
    match call(token).await {
        Err(Error::Unauthorized(_)) => call(refresh().await?).await,
        other => other,
    }
}

#[axum::debug_handler]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<impl IntoResponse> {
    let events = with_refresh_retry(&state, query.user_id, |token| {
        let service = state.calendar_service.clone();
        async move { service.list_events(&token, query.time_min, query.time_max).await }
    })
    .await?;
    Ok(Json(events))
}

#[axum::debug_handler]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if payload.end <= payload.start {
        return Err(Error::BadRequest("Event must end after it starts".to_string()));
    }
    let input = EventInput {
        title: payload.title.clone(),
        description: payload.description.clone(),
        start: payload.start,
        end: payload.end,
        location: payload.location.clone(),
    };
    let event = with_refresh_retry(&state, payload.user_id, |token| {
        let service = state.calendar_service.clone();
        let input = input.clone();
        async move { service.create_event(&token, &input).await }
    })
    .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[axum::debug_handler]
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let input = EventInput {
        title: payload.title.clone(),
        description: payload.description.clone(),
        start: payload.start,
        end: payload.end,
        location: payload.location.clone(),
    };
    let event = with_refresh_retry(&state, payload.user_id, |token| {
        let service = state.calendar_service.clone();
        let input = input.clone();
        let event_id = event_id.clone();
        async move { service.update_event(&token, &event_id, &input).await }
    })
    .await?;
    Ok(Json(event))
}

#[derive(Debug, Deserialize)]
pub struct DeleteEventQuery {
    pub user_id: i64,
}

#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<DeleteEventQuery>,
) -> Result<impl IntoResponse> {
    with_refresh_retry(&state, query.user_id, |token| {
        let service = state.calendar_service.clone();
        let event_id = event_id.clone();
        async move { service.delete_event(&token, &event_id).await }
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[tokio::test]
    async fn expired_authorization_refreshes_and_retries_once() {
        let calls = AtomicUsize::new(0);
        let result = retry_on_expiry(
            "stale".to_string(),
            |token| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if token == "stale" {
                        Err(Error::Unauthorized("Calendar authorization expired".to_string()))
                    } else {
                        Ok(token)
                    }
                }
            },
            || async { Ok("fresh".to_string()) },
        )
        .await
        .unwrap();
        assert_eq!(result, "fresh");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn a_valid_token_is_never_refreshed() {
        let refreshed = AtomicBool::new(false);
        let result = retry_on_expiry(
            "valid".to_string(),
            |token| async move { Ok(token) },
            || {
                refreshed.store(true, Ordering::SeqCst);
                async { Ok("fresh".to_string()) }
            },
        )
        .await
        .unwrap();
        assert_eq!(result, "valid");
        assert!(!refreshed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn non_authorization_failures_propagate_without_retry() {
        let calls = AtomicUsize::new(0);
        let result: Result<String> = retry_on_expiry(
            "valid".to_string(),
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::Upstream { status: 502 }) }
            },
            || async { Ok("fresh".to_string()) },
        )
        .await;
        assert!(matches!(result, Err(Error::Upstream { status: 502 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
