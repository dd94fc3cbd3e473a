use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::JobPosting;
use crate::rowstore::{tables, RowStoreClient};
use serde_json::json;

#[derive(Clone)]
pub struct JobService {
    rowstore: RowStoreClient,
}

impl JobService {
    pub fn new(rowstore: RowStoreClient) -> Self {
        Self { rowstore }
    }

    pub async fn list(&self, owner: Option<i64>) -> Result<Vec<JobPosting>> {
        let params = match owner {
            Some(id) => vec![("filter__owner__equal", id.to_string())],
            None => vec![],
        };
        let rows = self.rowstore.list_rows(tables::JOBS, &params).await?;
        Ok(rows.iter().filter_map(JobPosting::from_row).collect())
    }

    pub async fn get(&self, id: i64) -> Result<JobPosting> {
        let row = self.rowstore.get_row(tables::JOBS, id).await.map_err(|e| {
            if matches!(e, Error::NotFound(_)) {
                Error::NotFound("Job not found".to_string())
            } else {
                e
            }
        })?;
        JobPosting::from_row(&row).ok_or_else(|| Error::Internal("Malformed job row".to_string()))
    }

    pub async fn create(&self, payload: CreateJobPayload) -> Result<JobPosting> {
        let fields = json!({
            "title": payload.title,
            "description": payload.description,
            "address": payload.address,
            "required_skills": payload.required_skills,
            "desired_skills": payload.desired_skills,
            "owner": payload.owner,
            "created_at": crate::utils::time::to_rfc3339(crate::utils::time::now()),
        });
        let row = self.rowstore.create_row(tables::JOBS, fields).await?;
        JobPosting::from_row(&row).ok_or_else(|| Error::Internal("Malformed job row".to_string()))
    }

    /// Partial update: only the supplied fields reach the row store.
    pub async fn update(&self, id: i64, payload: UpdateJobPayload) -> Result<JobPosting> {
        let mut fields = serde_json::Map::new();
        if let Some(title) = payload.title {
            fields.insert("title".into(), json!(title));
        }
        if let Some(description) = payload.description {
            fields.insert("description".into(), json!(description));
        }
        if let Some(address) = payload.address {
            fields.insert("address".into(), json!(address));
        }
        if let Some(required) = payload.required_skills {
            fields.insert("required_skills".into(), json!(required));
        }
        if let Some(desired) = payload.desired_skills {
            fields.insert("desired_skills".into(), json!(desired));
        }
        if fields.is_empty() {
            return Err(Error::BadRequest("No fields to update".to_string()));
        }
        let row = self
            .rowstore
            .update_row(tables::JOBS, id, serde_json::Value::Object(fields))
            .await?;
        JobPosting::from_row(&row).ok_or_else(|| Error::Internal("Malformed job row".to_string()))
    }

    /// Deletes the job row only. Candidates keep a dangling job reference;
    /// there is no cascade.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.rowstore.delete_row(tables::JOBS, id).await
    }
}
