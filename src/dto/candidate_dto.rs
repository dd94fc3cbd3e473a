use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCandidatePayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub score: Option<i64>,
    #[serde(default)]
    pub job_ids: Vec<i64>,
    pub sex: Option<String>,
    pub education_level: Option<String>,
    #[validate(range(min = 14, max = 120))]
    pub age: Option<i64>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCandidatePayload {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub score: Option<i64>,
    pub job_ids: Option<Vec<i64>>,
    pub interview_notes: Option<String>,
    pub ai_summary: Option<String>,
}

/// Status transition request. `status` is a wire label, validated against
/// the canonical enumeration in the handler; the rejection reason travels in
/// the same request so status and reason persist in one logical update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: String,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContactPayload {
    pub last_contact: Option<DateTime<Utc>>,
}
