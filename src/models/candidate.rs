use crate::pipeline::status::CandidateStatus;
use crate::rowstore::normalize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value as JsonValue;
use tracing::warn;

/// Four-dimension behavioral profile, each 0-100.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehavioralProfile {
    pub executor: Option<i64>,
    pub communicator: Option<i64>,
    pub planner: Option<i64>,
    pub analyst: Option<i64>,
}

/// Interview-video attachment with its own sub-status, independent of the
/// pipeline status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInterview {
    pub url: String,
    pub sub_status: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Compatibility score 0-100; None means not yet scored.
    pub score: Option<i64>,
    /// None is the implicit initial state; every read surface serializes it
    /// as Screening so clients never see an absent status.
    #[serde(serialize_with = "serialize_effective_status")]
    pub status: Option<CandidateStatus>,
    pub job_ids: Vec<i64>,
    pub video_interview: Option<VideoInterview>,
    pub last_contact: Option<DateTime<Utc>>,
    pub ai_summary: Option<String>,
    pub profile: BehavioralProfile,
    pub behavioral_test_status: Option<String>,
    pub theoretical_test_status: Option<String>,
    pub sex: Option<String>,
    pub education_level: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub rejection_reason: Option<String>,
    pub interview_notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn from_row(row: &JsonValue) -> Option<Self> {
        // A malformed status label is logged and dropped to the initial
        // state rather than losing the candidate from every view.
        let status = match normalize::str_field(row, "status") {
            Some(raw) => match CandidateStatus::from_wire(&raw) {
                Ok(status) => Some(status),
                Err(err) => {
                    warn!(row_id = ?normalize::row_id(row), %err, "ignoring malformed status");
                    None
                }
            },
            None => None,
        };

        let video_interview = normalize::str_field(row, "video_url").map(|url| VideoInterview {
            url,
            sub_status: normalize::str_field(row, "video_status"),
            uploaded_at: normalize::datetime_field(row, "video_uploaded_at"),
        });

        Some(Self {
            id: normalize::row_id(row)?,
            name: normalize::str_field(row, "name").unwrap_or_default(),
            email: normalize::str_field(row, "email"),
            phone: normalize::str_field(row, "phone"),
            score: normalize::i64_field(row, "score"),
            status,
            job_ids: normalize::id_list_field(row, "jobs"),
            video_interview,
            last_contact: normalize::datetime_field(row, "last_contact"),
            ai_summary: normalize::str_field(row, "ai_summary"),
            profile: BehavioralProfile {
                executor: normalize::i64_field(row, "profile_executor"),
                communicator: normalize::i64_field(row, "profile_communicator"),
                planner: normalize::i64_field(row, "profile_planner"),
                analyst: normalize::i64_field(row, "profile_analyst"),
            },
            behavioral_test_status: normalize::str_field(row, "behavioral_test_status"),
            theoretical_test_status: normalize::str_field(row, "theoretical_test_status"),
            sex: normalize::str_field(row, "sex"),
            education_level: normalize::str_field(row, "education_level"),
            age: normalize::i64_field(row, "age"),
            city: normalize::str_field(row, "city"),
            neighborhood: normalize::str_field(row, "neighborhood"),
            rejection_reason: normalize::str_field(row, "rejection_reason"),
            interview_notes: normalize::str_field(row, "interview_notes"),
            created_at: normalize::datetime_field(row, "created_at"),
        })
    }

    /// Effective pipeline state: absent status means Screening.
    pub fn effective_status(&self) -> CandidateStatus {
        self.status.unwrap_or(CandidateStatus::INITIAL)
    }
}

fn serialize_effective_status<S: Serializer>(
    status: &Option<CandidateStatus>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    status.unwrap_or(CandidateStatus::INITIAL).serialize(serializer)
}
