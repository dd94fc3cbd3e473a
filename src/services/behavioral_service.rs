use crate::error::{Error, Result};
use crate::models::behavioral::{BehavioralResult, BehavioralStatus};
use crate::rowstore::{tables, RowStoreClient};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use sha2::Sha256;
use tracing::{info, warn};
use uuid::Uuid;

/// Minimum adjectives that must be selected in each sorting step.
const MIN_SELECTIONS: usize = 5;

/// Behavioral (adjective-sorting) test lifecycle:
/// Pending -> Processing (on submit, scoring webhook fired) -> Completed
/// (scores written by the callback, immutable afterwards) | Error.
#[derive(Clone)]
pub struct BehavioralService {
    rowstore: RowStoreClient,
    client: Client,
    webhook_url: String,
    webhook_secret: Option<String>,
}

impl BehavioralService {
    pub fn new(
        rowstore: RowStoreClient,
        webhook_url: String,
        webhook_secret: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client for behavioral service");
        Self {
            rowstore,
            client,
            webhook_url,
            webhook_secret,
        }
    }

    /// Creates a Pending result row and returns it; the opaque token is what
    /// gets handed to the unauthenticated participant as a link.
    pub async fn create_link(
        &self,
        candidate_id: i64,
        recruiter_id: i64,
    ) -> Result<BehavioralResult> {
        let token = Uuid::new_v4().to_string();
        let fields = json!({
            "token": token,
            "candidate": [candidate_id],
            "recruiter": [recruiter_id],
            "status": BehavioralStatus::Pending.as_wire(),
        });
        let row = self
            .rowstore
            .create_row(tables::BEHAVIORAL_RESULTS, fields)
            .await?;
        BehavioralResult::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed behavioral result row".to_string()))
    }

    pub async fn get_by_token(&self, token: &str) -> Result<BehavioralResult> {
        let rows = self
            .rowstore
            .list_rows(
                tables::BEHAVIORAL_RESULTS,
                &[("filter__token__equal", token.to_string())],
            )
            .await?;
        rows.iter()
            .filter_map(BehavioralResult::from_row)
            .next()
            .ok_or_else(|| Error::NotFound("Test link not found".to_string()))
    }

    /// Participant submission. Each sorting step must carry the minimum
    /// selection count; a second submission is a distinct terminal error.
    pub async fn submit(&self, token: &str, responses: JsonValue) -> Result<BehavioralResult> {
        let result = self.get_by_token(token).await?;
        if matches!(
            result.status,
            BehavioralStatus::Processing | BehavioralStatus::Completed
        ) {
            return Err(Error::AlreadyCompleted(
                "This test has already been answered".to_string(),
            ));
        }
        validate_responses(&responses)?;

        let fields = json!({
            "status": BehavioralStatus::Processing.as_wire(),
            "responses": responses.to_string(),
            "responded_at": crate::utils::time::to_rfc3339(crate::utils::time::now()),
        });
        let row = self
            .rowstore
            .update_row(tables::BEHAVIORAL_RESULTS, result.id, fields)
            .await?;
        let updated = BehavioralResult::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed behavioral result row".to_string()))?;

        // Scoring is asynchronous and external; a failed trigger leaves the
        // row in Processing and is retried by re-submitting the webhook
        // manually, not by the participant.
        if let Err(err) = self.trigger_scoring(&updated, &responses).await {
            warn!(result_id = updated.id, %err, "behavioral scoring trigger failed");
        }
        Ok(updated)
    }

    async fn trigger_scoring(&self, result: &BehavioralResult, responses: &JsonValue) -> Result<()> {
        let body = json!({
            "result_id": result.id,
            "token": result.token,
            "candidate_id": result.candidate_id,
            "responses": responses,
        });
        let raw = body.to_string();

        let mut request = self
            .client
            .post(&self.webhook_url)
            .header("Content-Type", "application/json")
            .body(raw.clone());
        if let Some(secret) = &self.webhook_secret {
            request = request.header("X-Signature", sign(secret, &raw));
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Error::Upstream {
                status: response.status().as_u16(),
            });
        }
        info!(result_id = result.id, "behavioral scoring triggered");
        Ok(())
    }

    /// Scoring callback: writes the four dimensions and the summary, and
    /// marks the result Completed. A completed result is immutable.
    pub async fn complete(
        &self,
        token: &str,
        executor: i64,
        communicator: i64,
        planner: i64,
        analyst: i64,
        summary: Option<String>,
    ) -> Result<BehavioralResult> {
        let result = self.get_by_token(token).await?;
        if result.status == BehavioralStatus::Completed {
            return Err(Error::AlreadyCompleted(
                "This result has already been scored".to_string(),
            ));
        }

        let fields = json!({
            "status": BehavioralStatus::Completed.as_wire(),
            "profile_executor": executor,
            "profile_communicator": communicator,
            "profile_planner": planner,
            "profile_analyst": analyst,
            "summary": summary,
        });
        let row = self
            .rowstore
            .update_row(tables::BEHAVIORAL_RESULTS, result.id, fields)
            .await?;
        let completed = BehavioralResult::from_row(&row)
            .ok_or_else(|| Error::Internal("Malformed behavioral result row".to_string()))?;

        // Mirror the profile onto the candidate so the pipeline views show
        // it without joining result rows.
        if let Some(candidate_id) = completed.candidate_id {
            let candidate_fields = json!({
                "profile_executor": executor,
                "profile_communicator": communicator,
                "profile_planner": planner,
                "profile_analyst": analyst,
                "behavioral_test_status": "Concluído",
            });
            if let Err(err) = self
                .rowstore
                .update_row(tables::CANDIDATES, candidate_id, candidate_fields)
                .await
            {
                warn!(candidate_id, %err, "failed to mirror behavioral profile onto candidate");
            }
        }
        Ok(completed)
    }

    pub fn verify_signature(&self, body: &str, signature: &str) -> bool {
        match &self.webhook_secret {
            Some(secret) => sign(secret, body) == signature,
            // No secret configured: accept, the deployment opted out.
            None => true,
        }
    }
}

fn validate_responses(responses: &JsonValue) -> Result<()> {
    let steps = responses
        .get("steps")
        .and_then(|v| v.as_array())
        .ok_or_else(|| Error::BadRequest("Responses must contain sorting steps".to_string()))?;
    if steps.is_empty() {
        return Err(Error::BadRequest("Responses must contain sorting steps".to_string()));
    }
    for (index, step) in steps.iter().enumerate() {
        let selected = step
            .get("selected")
            .and_then(|v| v.as_array())
            .map(|v| v.len())
            .unwrap_or(0);
        if selected < MIN_SELECTIONS {
            return Err(Error::BadRequest(format!(
                "Step {} requires at least {} selected adjectives",
                index + 1,
                MIN_SELECTIONS
            )));
        }
    }
    Ok(())
}

fn sign(secret: &str, body: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_below_the_selection_threshold_are_rejected() {
        let thin = json!({ "steps": [{ "selected": ["calmo", "ativo"] }] });
        assert!(validate_responses(&thin).is_err());

        let full = json!({ "steps": [{
            "selected": ["calmo", "ativo", "focado", "criativo", "líder"]
        }] });
        assert!(validate_responses(&full).is_ok());
    }

    #[test]
    fn empty_or_shapeless_responses_are_rejected() {
        assert!(validate_responses(&json!({})).is_err());
        assert!(validate_responses(&json!({ "steps": [] })).is_err());
    }

    #[test]
    fn signature_is_hex_hmac_sha256_of_the_body() {
        let signature = sign("secret", "payload");
        assert_eq!(signature.len(), 64);
        assert_eq!(signature, sign("secret", "payload"));
        assert_ne!(signature, sign("other", "payload"));
    }
}
