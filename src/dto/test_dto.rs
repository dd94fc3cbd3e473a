use crate::models::theoretical::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTestModelPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub questions: Vec<Question>,
    #[validate(range(min = 1))]
    pub time_limit_minutes: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyTestPayload {
    pub model_id: i64,
    pub candidate_id: i64,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAnswerPayload {
    pub question_index: usize,
    pub answer: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBehavioralLinkPayload {
    pub candidate_id: i64,
    pub recruiter_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralSubmitPayload {
    pub responses: JsonValue,
}

/// Scoring-callback body from the behavioral scoring collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteBehavioralPayload {
    pub token: String,
    #[validate(range(min = 0, max = 100))]
    pub executor: i64,
    #[validate(range(min = 0, max = 100))]
    pub communicator: i64,
    #[validate(range(min = 0, max = 100))]
    pub planner: i64,
    #[validate(range(min = 0, max = 100))]
    pub analyst: i64,
    pub summary: Option<String>,
}
