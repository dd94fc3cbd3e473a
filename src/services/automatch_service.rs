use crate::error::{Error, Result};
use crate::models::candidate::BehavioralProfile;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

/// One entry of the ranked list returned by the scoring collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub candidate_id: i64,
    pub score: i64,
    pub dimension_fit: BehavioralProfile,
    pub rationale: Option<String>,
}

/// External scoring collaborator. Nothing about the matching algorithm is
/// implemented locally; this service triggers the call and reshapes the
/// ranked response.
#[derive(Clone)]
pub struct AutoMatchService {
    client: Client,
    endpoint: Option<String>,
}

impl AutoMatchService {
    pub fn new(endpoint: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client for auto-match service");
        Self { client, endpoint }
    }

    pub async fn execute(&self, job_id: i64, user_id: i64) -> Result<Vec<RankedCandidate>> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            Error::BadRequest("Auto-match collaborator is not configured".to_string())
        })?;

        let response = self
            .client
            .post(endpoint)
            .json(&json!({ "job_id": job_id, "user_id": user_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "auto-match request failed");
            return Err(Error::Upstream {
                status: status.as_u16(),
            });
        }

        let ranked: Vec<RankedCandidate> = response.json().await?;
        Ok(ranked)
    }
}
