use crate::error::{Error, Result};
use crate::models::calendar::CalendarEvent;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::error;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";
const SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
}

/// Proxy to the external calendar collaborator. Events are never owned or
/// cached here; every operation is a pass-through on behalf of a connected
/// recruiter.
#[derive(Clone)]
pub struct CalendarService {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl CalendarService {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client for calendar service");
        Self {
            client,
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// Consent-screen URL the browser is redirected to.
    pub fn auth_url(&self, state: &str) -> String {
        let mut url = url::Url::parse(AUTH_URL).expect("static auth url");
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPE)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("state", state);
        url.to_string()
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        self.parse_tokens(response).await
    }

    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;
        self.parse_tokens(response).await
    }

    async fn parse_tokens(&self, response: reqwest::Response) -> Result<TokenResponse> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "calendar token request failed");
            return Err(Error::Upstream {
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    pub async fn list_events(
        &self,
        access_token: &str,
        time_min: Option<DateTime<Utc>>,
        time_max: Option<DateTime<Utc>>,
    ) -> Result<Vec<CalendarEvent>> {
        let mut request = self
            .client
            .get(EVENTS_URL)
            .bearer_auth(access_token)
            .query(&[("singleEvents", "true"), ("orderBy", "startTime")]);
        if let Some(min) = time_min {
            request = request.query(&[("timeMin", min.to_rfc3339())]);
        }
        if let Some(max) = time_max {
            request = request.query(&[("timeMax", max.to_rfc3339())]);
        }
        let body: JsonValue = self.check(request.send().await?).await?.json().await?;
        let items = body
            .get("items")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(items.iter().filter_map(parse_event).collect())
    }

    pub async fn create_event(
        &self,
        access_token: &str,
        input: &EventInput,
    ) -> Result<CalendarEvent> {
        let body: JsonValue = self
            .check(
                self.client
                    .post(EVENTS_URL)
                    .bearer_auth(access_token)
                    .json(&event_body(input))
                    .send()
                    .await?,
            )
            .await?
            .json()
            .await?;
        parse_event(&body).ok_or_else(|| Error::Internal("Malformed event response".to_string()))
    }

    pub async fn update_event(
        &self,
        access_token: &str,
        event_id: &str,
        input: &EventInput,
    ) -> Result<CalendarEvent> {
        let body: JsonValue = self
            .check(
                self.client
                    .put(format!("{}/{}", EVENTS_URL, event_id))
                    .bearer_auth(access_token)
                    .json(&event_body(input))
                    .send()
                    .await?,
            )
            .await?
            .json()
            .await?;
        parse_event(&body).ok_or_else(|| Error::Internal("Malformed event response".to_string()))
    }

    pub async fn delete_event(&self, access_token: &str, event_id: &str) -> Result<()> {
        self.check(
            self.client
                .delete(format!("{}/{}", EVENTS_URL, event_id))
                .bearer_auth(access_token)
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound("Calendar event not found".to_string()));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized(
                "Calendar authorization expired".to_string(),
            ));
        }
        let body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %body, "calendar request failed");
        Err(Error::Upstream {
            status: status.as_u16(),
        })
    }
}

fn event_body(input: &EventInput) -> JsonValue {
    json!({
        "summary": input.title,
        "description": input.description,
        "location": input.location,
        "start": { "dateTime": input.start.to_rfc3339() },
        "end": { "dateTime": input.end.to_rfc3339() },
    })
}

fn parse_event(item: &JsonValue) -> Option<CalendarEvent> {
    let start = item
        .pointer("/start/dateTime")
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())?
        .with_timezone(&Utc);
    let end = item
        .pointer("/end/dateTime")
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())?
        .with_timezone(&Utc);
    Some(CalendarEvent {
        external_id: item.get("id")?.as_str()?.to_string(),
        title: item
            .get("summary")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        description: item
            .get("description")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        start,
        end,
        location: item
            .get("location")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        html_link: item
            .get("htmlLink")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
    })
}
