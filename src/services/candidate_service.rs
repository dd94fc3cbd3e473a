use crate::dto::candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload};
use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::pipeline::status::CandidateStatus;
use crate::rowstore::{tables, RowStoreClient};
use chrono::{DateTime, Utc};
use serde_json::json;

#[derive(Clone)]
pub struct CandidateService {
    rowstore: RowStoreClient,
}

impl CandidateService {
    pub fn new(rowstore: RowStoreClient) -> Self {
        Self { rowstore }
    }

    pub async fn list(&self, job_id: Option<i64>) -> Result<Vec<Candidate>> {
        let params = match job_id {
            Some(id) => vec![("filter__jobs__link_row_has", id.to_string())],
            None => vec![],
        };
        let rows = self.rowstore.list_rows(tables::CANDIDATES, &params).await?;
        Ok(rows.iter().filter_map(Candidate::from_row).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Candidate> {
        let row = self
            .rowstore
            .get_row(tables::CANDIDATES, id)
            .await
            .map_err(|e| {
                if matches!(e, Error::NotFound(_)) {
                    Error::NotFound("Candidate not found".to_string())
                } else {
                    e
                }
            })?;
        Candidate::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed candidate row".to_string()))
    }

    pub async fn create(&self, payload: CreateCandidatePayload) -> Result<Candidate> {
        let fields = json!({
            "name": payload.name,
            "email": payload.email,
            "phone": payload.phone,
            "score": payload.score,
            "jobs": payload.job_ids,
            "sex": payload.sex,
            "education_level": payload.education_level,
            "age": payload.age,
            "city": payload.city,
            "neighborhood": payload.neighborhood,
            "created_at": crate::utils::time::to_rfc3339(crate::utils::time::now()),
        });
        let row = self.rowstore.create_row(tables::CANDIDATES, fields).await?;
        Candidate::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed candidate row".to_string()))
    }

    pub async fn update(&self, id: i64, payload: UpdateCandidatePayload) -> Result<Candidate> {
        let mut fields = serde_json::Map::new();
        if let Some(name) = payload.name {
            fields.insert("name".into(), json!(name));
        }
        if let Some(email) = payload.email {
            fields.insert("email".into(), json!(email));
        }
        if let Some(phone) = payload.phone {
            fields.insert("phone".into(), json!(phone));
        }
        if let Some(score) = payload.score {
            fields.insert("score".into(), json!(score));
        }
        if let Some(job_ids) = payload.job_ids {
            fields.insert("jobs".into(), json!(job_ids));
        }
        if let Some(notes) = payload.interview_notes {
            fields.insert("interview_notes".into(), json!(notes));
        }
        if let Some(summary) = payload.ai_summary {
            fields.insert("ai_summary".into(), json!(summary));
        }
        if fields.is_empty() {
            return Err(Error::BadRequest("No fields to update".to_string()));
        }
        let row = self
            .rowstore
            .update_row(tables::CANDIDATES, id, serde_json::Value::Object(fields))
            .await?;
        Candidate::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed candidate row".to_string()))
    }

    /// Persists a status transition. Status and rejection reason travel in
    /// one logical update so a Rejected row always carries its reason.
    pub async fn update_status(
        &self,
        id: i64,
        status: CandidateStatus,
        reason: Option<String>,
    ) -> Result<Candidate> {
        let mut fields = serde_json::Map::new();
        fields.insert("status".into(), json!(status.as_wire()));
        if status == CandidateStatus::Rejected {
            fields.insert("rejection_reason".into(), json!(reason));
        }
        let row = self
            .rowstore
            .update_row(tables::CANDIDATES, id, serde_json::Value::Object(fields))
            .await?;
        Candidate::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed candidate row".to_string()))
    }

    pub async fn update_last_contact(
        &self,
        id: i64,
        at: Option<DateTime<Utc>>,
    ) -> Result<Candidate> {
        let at = at.unwrap_or_else(crate::utils::time::now);
        let fields = json!({ "last_contact": crate::utils::time::to_rfc3339(at) });
        let row = self
            .rowstore
            .update_row(tables::CANDIDATES, id, fields)
            .await?;
        Candidate::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed candidate row".to_string()))
    }

    /// Relays an interview video to the row store and attaches the hosted
    /// URL to the candidate.
    pub async fn attach_video(
        &self,
        id: i64,
        filename: &str,
        data: bytes::Bytes,
    ) -> Result<Candidate> {
        let url = self.rowstore.upload_file(filename, data).await?;
        let fields = json!({
            "video_url": url,
            "video_status": "Recebido",
            "video_uploaded_at": crate::utils::time::to_rfc3339(crate::utils::time::now()),
        });
        let row = self
            .rowstore
            .update_row(tables::CANDIDATES, id, fields)
            .await?;
        Candidate::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed candidate row".to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.rowstore.delete_row(tables::CANDIDATES, id).await
    }
}
