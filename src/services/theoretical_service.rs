use crate::dto::test_dto::CreateTestModelPayload;
use crate::error::{Error, Result};
use crate::models::theoretical::{AppliedTest, Question, QuestionType, TheoreticalTestModel};
use crate::rowstore::{tables, RowStoreClient};
use chrono::{DateTime, Utc};
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use tracing::warn;
use uuid::Uuid;

/// Theoretical quiz lifecycle: a model is applied to one candidate with a
/// deadline; answers accumulate per question until a single submission,
/// after which objective questions are scored and essays are left for
/// manual grading.
#[derive(Clone)]
pub struct TheoreticalService {
    rowstore: RowStoreClient,
}

impl TheoreticalService {
    pub fn new(rowstore: RowStoreClient) -> Self {
        Self { rowstore }
    }

    pub async fn create_model(&self, payload: CreateTestModelPayload) -> Result<TheoreticalTestModel> {
        validate_questions(&payload.questions)?;
        let fields = json!({
            "title": payload.title,
            "questions": serde_json::to_string(&payload.questions)?,
            "time_limit_minutes": payload.time_limit_minutes,
            "active": payload.active.unwrap_or(true),
        });
        let row = self
            .rowstore
            .create_row(tables::THEORETICAL_MODELS, fields)
            .await?;
        TheoreticalTestModel::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed test model row".to_string()))
    }

    pub async fn list_models(&self) -> Result<Vec<TheoreticalTestModel>> {
        let rows = self
            .rowstore
            .list_rows(tables::THEORETICAL_MODELS, &[])
            .await?;
        Ok(rows.iter().filter_map(TheoreticalTestModel::from_row).collect())
    }

    pub async fn get_model(&self, id: i64) -> Result<TheoreticalTestModel> {
        let row = self
            .rowstore
            .get_row(tables::THEORETICAL_MODELS, id)
            .await
            .map_err(|e| {
                if matches!(e, Error::NotFound(_)) {
                    Error::NotFound("Test model not found".to_string())
                } else {
                    e
                }
            })?;
        TheoreticalTestModel::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed test model row".to_string()))
    }

    pub async fn set_model_active(&self, id: i64, active: bool) -> Result<TheoreticalTestModel> {
        let row = self
            .rowstore
            .update_row(tables::THEORETICAL_MODELS, id, json!({ "active": active }))
            .await?;
        TheoreticalTestModel::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed test model row".to_string()))
    }

    /// Binds a model to a candidate. The returned token is the opaque link
    /// identifier for the unauthenticated participant.
    pub async fn apply(
        &self,
        model_id: i64,
        candidate_id: i64,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<AppliedTest> {
        let model = self.get_model(model_id).await?;
        if !model.active {
            return Err(Error::BadRequest("Test model is not active".to_string()));
        }
        let token = Uuid::new_v4().to_string();
        let fields = json!({
            "token": token,
            "model": [model_id],
            "candidate": [candidate_id],
            "deadline": deadline.map(|d| d.to_rfc3339()),
        });
        let row = self.rowstore.create_row(tables::APPLIED_TESTS, fields).await?;
        AppliedTest::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed applied test row".to_string()))
    }

    pub async fn get_by_token(&self, token: &str) -> Result<AppliedTest> {
        let rows = self
            .rowstore
            .list_rows(
                tables::APPLIED_TESTS,
                &[("filter__token__equal", token.to_string())],
            )
            .await?;
        rows.iter()
            .filter_map(AppliedTest::from_row)
            .next()
            .ok_or_else(|| Error::NotFound("Test link not found".to_string()))
    }

    /// Participant view: the model's questions with grading keys stripped.
    pub async fn participant_view(
        &self,
        token: &str,
    ) -> Result<(AppliedTest, Vec<Question>, Option<i64>)> {
        let applied = self.get_by_token(token).await?;
        if applied.is_submitted() {
            return Err(Error::AlreadyCompleted(
                "This test has already been answered".to_string(),
            ));
        }
        let model_id = applied
            .model_id
            .ok_or_else(|| Error::Internal("Applied test has no model".to_string()))?;
        let model = self.get_model(model_id).await?;
        let questions = model.questions.iter().map(Question::public_view).collect();
        Ok((applied, questions, model.time_limit_minutes))
    }

    /// Accumulates one answer, keyed by question index. Refused after
    /// submission.
    pub async fn save_answer(
        &self,
        token: &str,
        question_index: usize,
        answer: JsonValue,
    ) -> Result<AppliedTest> {
        let applied = self.get_by_token(token).await?;
        if applied.is_submitted() {
            return Err(Error::AlreadyCompleted(
                "This test has already been answered".to_string(),
            ));
        }

        let mut answers = applied.answers.clone();
        answers.insert(question_index, answer);
        let fields = json!({ "answers": serde_json::to_string(&answers)? });
        let row = self
            .rowstore
            .update_row(tables::APPLIED_TESTS, applied.id, fields)
            .await?;
        AppliedTest::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed applied test row".to_string()))
    }

    /// One-shot submission: scores objective questions, stamps
    /// `submitted_at`, and leaves essays ungraded. A second submission is a
    /// distinct terminal error, and the deadline is enforced here.
    pub async fn submit(&self, token: &str) -> Result<AppliedTest> {
        let applied = self.get_by_token(token).await?;
        if applied.is_submitted() {
            return Err(Error::AlreadyCompleted(
                "This test has already been answered".to_string(),
            ));
        }
        if let Some(deadline) = applied.deadline {
            if crate::utils::time::now() > deadline {
                return Err(Error::BadRequest("The test deadline has passed".to_string()));
            }
        }

        let model_id = applied
            .model_id
            .ok_or_else(|| Error::Internal("Applied test has no model".to_string()))?;
        let model = self.get_model(model_id).await?;

        let unanswered = model
            .questions
            .iter()
            .enumerate()
            .any(|(index, _)| !applied.answers.contains_key(&index));
        if unanswered {
            return Err(Error::BadRequest(
                "All questions must be answered before submitting".to_string(),
            ));
        }

        let score = score_objective(&model.questions, &applied.answers);
        let fields = json!({
            "submitted_at": crate::utils::time::to_rfc3339(crate::utils::time::now()),
            "score": score.map(|s| s.to_string()),
        });
        let row = self
            .rowstore
            .update_row(tables::APPLIED_TESTS, applied.id, fields)
            .await?;

        // Test status is mirrored onto the candidate for the pipeline views;
        // the mirror is best-effort and never fails the submission.
        if let Some(candidate_id) = applied.candidate_id {
            if let Err(err) = self
                .rowstore
                .update_row(
                    tables::CANDIDATES,
                    candidate_id,
                    json!({ "theoretical_test_status": "Concluído" }),
                )
                .await
            {
                warn!(candidate_id, %err, "failed to mirror theoretical test status onto candidate");
            }
        }

        AppliedTest::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed applied test row".to_string()))
    }
}

fn validate_questions(questions: &[Question]) -> Result<()> {
    if questions.is_empty() {
        return Err(Error::BadRequest("A test model needs at least one question".to_string()));
    }
    for (index, question) in questions.iter().enumerate() {
        match question.question_type {
            QuestionType::MultipleChoice => {
                let options = question.options.as_deref().unwrap_or_default();
                let correct = question.correct_answer.unwrap_or(-1);
                if options.len() < 2 || correct < 0 || correct as usize >= options.len() {
                    return Err(Error::BadRequest(format!(
                        "Question {} has invalid options or answer key",
                        index + 1
                    )));
                }
            }
            QuestionType::TrueFalse => {
                if question.correct_bool.is_none() {
                    return Err(Error::BadRequest(format!(
                        "Question {} is missing its expected answer",
                        index + 1
                    )));
                }
            }
            QuestionType::Essay => {}
        }
    }
    Ok(())
}

/// Percentage of objective points earned, or None when the model has no
/// objective questions at all.
fn score_objective(questions: &[Question], answers: &BTreeMap<usize, JsonValue>) -> Option<f64> {
    let mut earned = 0i64;
    let mut possible = 0i64;
    for (index, question) in questions.iter().enumerate() {
        if !question.is_objective() {
            continue;
        }
        possible += question.points;
        let Some(answer) = answers.get(&index) else {
            continue;
        };
        let correct = match question.question_type {
            QuestionType::MultipleChoice => {
                answer.as_i64().is_some() && answer.as_i64() == question.correct_answer
            }
            QuestionType::TrueFalse => {
                answer.as_bool().is_some() && answer.as_bool() == question.correct_bool
            }
            QuestionType::Essay => false,
        };
        if correct {
            earned += question.points;
        }
    }
    if possible == 0 {
        return None;
    }
    Some((earned as f64 / possible as f64) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multiple_choice(correct: i64, points: i64) -> Question {
        Question {
            question_type: QuestionType::MultipleChoice,
            question: "?".to_string(),
            points,
            options: Some(vec!["a".into(), "b".into(), "c".into()]),
            correct_answer: Some(correct),
            correct_bool: None,
        }
    }

    fn true_false(expected: bool) -> Question {
        Question {
            question_type: QuestionType::TrueFalse,
            question: "?".to_string(),
            points: 1,
            options: None,
            correct_answer: None,
            correct_bool: Some(expected),
        }
    }

    fn essay() -> Question {
        Question {
            question_type: QuestionType::Essay,
            question: "?".to_string(),
            points: 5,
            options: None,
            correct_answer: None,
            correct_bool: None,
        }
    }

    #[test]
    fn objective_questions_score_as_percentage_of_points() {
        let questions = vec![multiple_choice(1, 2), true_false(true), essay()];
        let mut answers = BTreeMap::new();
        answers.insert(0, json!(1));
        answers.insert(1, json!(false));
        answers.insert(2, json!("longa resposta"));
        // 2 of 3 objective points; the essay is excluded from scoring.
        let score = score_objective(&questions, &answers).unwrap();
        assert!((score - 66.66).abs() < 1.0);
    }

    #[test]
    fn essay_only_models_have_no_objective_score() {
        let questions = vec![essay()];
        let mut answers = BTreeMap::new();
        answers.insert(0, json!("texto"));
        assert_eq!(score_objective(&questions, &answers), None);
    }

    #[test]
    fn answer_key_out_of_range_is_rejected_at_authoring() {
        let bad = vec![multiple_choice(7, 1)];
        assert!(validate_questions(&bad).is_err());
        let good = vec![multiple_choice(2, 1)];
        assert!(validate_questions(&good).is_ok());
    }

    #[test]
    fn participant_view_strips_grading_keys() {
        let question = multiple_choice(1, 1);
        let public = question.public_view();
        assert!(public.correct_answer.is_none());
        assert!(public.options.is_some());
    }
}
