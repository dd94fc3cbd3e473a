use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Interview event in the external calendar. This system is a consumer and
/// producer through the collaborator's API; it never owns the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub external_id: String,
    pub title: String,
    /// Sometimes a JSON-encoded metadata blob linking back to a
    /// candidate/job pair; passed through opaquely.
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub html_link: Option<String>,
}
