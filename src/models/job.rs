use crate::rowstore::normalize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub address: Option<String>,
    pub required_skills: Option<String>,
    pub desired_skills: Option<String>,
    pub owner: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    pub fn from_row(row: &JsonValue) -> Option<Self> {
        Some(Self {
            id: normalize::row_id(row)?,
            title: normalize::str_field(row, "title").unwrap_or_default(),
            description: normalize::str_field(row, "description").unwrap_or_default(),
            address: normalize::str_field(row, "address"),
            required_skills: normalize::str_field(row, "required_skills"),
            desired_skills: normalize::str_field(row, "desired_skills"),
            owner: normalize::i64_field(row, "owner")
                .or_else(|| normalize::id_list_field(row, "owner").into_iter().next()),
            created_at: normalize::datetime_field(row, "created_at"),
        })
    }
}
