use serde::{Deserialize, Serialize};
use validator::Validate;

/// Title, description and a non-empty owner reference are required; a
/// missing field is a client error, never silently defaulted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub address: Option<String>,
    pub required_skills: Option<String>,
    pub desired_skills: Option<String>,
    #[validate(range(min = 1))]
    pub owner: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub address: Option<String>,
    pub required_skills: Option<String>,
    pub desired_skills: Option<String>,
}
