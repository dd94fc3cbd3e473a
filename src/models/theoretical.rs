use crate::rowstore::normalize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    Essay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    #[serde(default = "default_points")]
    pub points: i64,
    /// Options for multiple-choice questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Correct option index (multiple-choice) — omitted from participant
    /// views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<i64>,
    /// Expected boolean (true/false questions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_bool: Option<bool>,
}

fn default_points() -> i64 {
    1
}

impl Question {
    /// Participant-facing copy with grading keys stripped.
    pub fn public_view(&self) -> Question {
        Question {
            correct_answer: None,
            correct_bool: None,
            ..self.clone()
        }
    }

    pub fn is_objective(&self) -> bool {
        !matches!(self.question_type, QuestionType::Essay)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheoreticalTestModel {
    pub id: i64,
    pub title: String,
    pub questions: Vec<Question>,
    pub time_limit_minutes: Option<i64>,
    pub active: bool,
}

impl TheoreticalTestModel {
    pub fn from_row(row: &JsonValue) -> Option<Self> {
        let questions = normalize::json_field(row, "questions")
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        Some(Self {
            id: normalize::row_id(row)?,
            title: normalize::str_field(row, "title").unwrap_or_default(),
            questions,
            time_limit_minutes: normalize::i64_field(row, "time_limit_minutes"),
            active: normalize::bool_field(row, "active").unwrap_or(false),
        })
    }
}

/// One model bound to one candidate, with its own deadline and answer set.
/// Answers accumulate keyed by question index until submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedTest {
    pub id: i64,
    pub token: String,
    pub model_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    pub answers: BTreeMap<usize, JsonValue>,
    pub submitted_at: Option<DateTime<Utc>>,
    /// Objective-question score; essays are left for manual grading.
    pub score: Option<f64>,
}

impl AppliedTest {
    pub fn from_row(row: &JsonValue) -> Option<Self> {
        let answers = normalize::json_field(row, "answers")
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        Some(Self {
            id: normalize::row_id(row)?,
            token: normalize::str_field(row, "token")?,
            model_id: normalize::i64_field(row, "model")
                .or_else(|| normalize::id_list_field(row, "model").into_iter().next()),
            candidate_id: normalize::i64_field(row, "candidate")
                .or_else(|| normalize::id_list_field(row, "candidate").into_iter().next()),
            deadline: normalize::datetime_field(row, "deadline"),
            answers,
            submitted_at: normalize::datetime_field(row, "submitted_at"),
            score: normalize::str_field(row, "score").and_then(|s| s.parse().ok()),
        })
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}
