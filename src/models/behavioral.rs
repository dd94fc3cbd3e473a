use crate::models::candidate::BehavioralProfile;
use crate::rowstore::normalize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehavioralStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl BehavioralStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            BehavioralStatus::Pending => "Pending",
            BehavioralStatus::Processing => "Processing",
            BehavioralStatus::Completed => "Completed",
            BehavioralStatus::Error => "Error",
        }
    }

    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "Pending" => Some(BehavioralStatus::Pending),
            "Processing" => Some(BehavioralStatus::Processing),
            "Completed" => Some(BehavioralStatus::Completed),
            "Error" => Some(BehavioralStatus::Error),
            _ => None,
        }
    }
}

/// One behavioral (adjective-sorting) test instance. Immutable once
/// Completed: the scoring callback refuses to overwrite a completed result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralResult {
    pub id: i64,
    pub token: String,
    pub candidate_id: Option<i64>,
    pub recruiter_id: Option<i64>,
    pub responded_at: Option<DateTime<Utc>>,
    pub status: BehavioralStatus,
    pub responses: Option<JsonValue>,
    pub profile: BehavioralProfile,
    pub summary: Option<String>,
}

impl BehavioralResult {
    pub fn from_row(row: &JsonValue) -> Option<Self> {
        let status = normalize::str_field(row, "status")
            .and_then(|raw| BehavioralStatus::from_wire(&raw))
            .unwrap_or(BehavioralStatus::Pending);
        Some(Self {
            id: normalize::row_id(row)?,
            token: normalize::str_field(row, "token")?,
            candidate_id: normalize::i64_field(row, "candidate")
                .or_else(|| normalize::id_list_field(row, "candidate").into_iter().next()),
            recruiter_id: normalize::i64_field(row, "recruiter")
                .or_else(|| normalize::id_list_field(row, "recruiter").into_iter().next()),
            responded_at: normalize::datetime_field(row, "responded_at"),
            status,
            responses: normalize::json_field(row, "responses"),
            profile: BehavioralProfile {
                executor: normalize::i64_field(row, "profile_executor"),
                communicator: normalize::i64_field(row, "profile_communicator"),
                planner: normalize::i64_field(row, "profile_planner"),
                analyst: normalize::i64_field(row, "profile_analyst"),
            },
            summary: normalize::str_field(row, "summary"),
        })
    }
}
