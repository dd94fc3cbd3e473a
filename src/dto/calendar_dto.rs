use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventPayload {
    pub user_id: i64,
    #[validate(length(min = 1))]
    pub title: String,
    /// May carry a JSON-encoded metadata blob linking a candidate/job pair;
    /// passed through to the calendar collaborator opaquely.
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventListQuery {
    pub user_id: i64,
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: String,
    /// Carries the connecting user's id through the consent round-trip.
    pub state: String,
}
