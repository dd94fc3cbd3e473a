use crate::models::candidate::Candidate;
use crate::models::job::JobPosting;
use crate::pipeline::status::CandidateStatus;
use crate::pipeline::transition::{plan, TransitionPlan, TransitionRequest};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, warn};

/// Network seam of the client store: the Domain Services as seen from a
/// session. The production implementation is [`HttpBackend`]; tests mock it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PipelineBackend: Send + Sync {
    async fn fetch_jobs(&self, profile_id: i64) -> Result<Vec<JobPosting>>;
    async fn fetch_candidates(&self, profile_id: i64) -> Result<Vec<Candidate>>;
    async fn patch_status(
        &self,
        candidate_id: i64,
        status: CandidateStatus,
        reason: Option<String>,
    ) -> Result<()>;
    async fn patch_job(&self, job_id: i64, patch: serde_json::Value) -> Result<()>;
    async fn delete_job(&self, job_id: i64) -> Result<()>;
    async fn delete_candidate(&self, candidate_id: i64) -> Result<()>;
}

/// In-memory source of truth for one session's jobs and candidates. Rebuilt
/// wholesale on each full fetch; mutated only through the pure functions
/// below, never from render code.
#[derive(Debug, Default, Clone)]
pub struct PipelineStore {
    pub jobs: Vec<JobPosting>,
    pub candidates: Vec<Candidate>,
    pub loading: bool,
}

impl PipelineStore {
    pub fn replace_all(&mut self, jobs: Vec<JobPosting>, candidates: Vec<Candidate>) {
        self.jobs = jobs;
        self.candidates = candidates;
    }

    /// Local-only status mutation used for optimistic updates. Returns false
    /// when the candidate is not in the store.
    pub fn apply_status(
        &mut self,
        candidate_id: i64,
        status: CandidateStatus,
        reason: Option<String>,
    ) -> bool {
        match self.candidates.iter_mut().find(|c| c.id == candidate_id) {
            Some(candidate) => {
                candidate.status = Some(status);
                if status == CandidateStatus::Rejected {
                    candidate.rejection_reason = reason;
                }
                true
            }
            None => false,
        }
    }

    pub fn remove_candidate(&mut self, candidate_id: i64) {
        self.candidates.retain(|c| c.id != candidate_id);
    }

    pub fn remove_job(&mut self, job_id: i64) {
        self.jobs.retain(|j| j.id != job_id);
    }

    pub fn candidate(&self, candidate_id: i64) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == candidate_id)
    }
}

/// Pairs the store with its backend and enforces the synchronization
/// contract: optimistic application for ordinary transitions, deferred
/// application for Rejected, and reconciliation by full refetch on failure.
pub struct PipelineSession<B> {
    pub store: PipelineStore,
    backend: B,
    profile_id: i64,
}

impl<B: PipelineBackend> PipelineSession<B> {
    pub fn new(backend: B, profile_id: i64) -> Self {
        Self {
            store: PipelineStore::default(),
            backend,
            profile_id,
        }
    }

    /// Idempotent full refresh: replaces both collections wholesale.
    pub async fn fetch_all(&mut self) -> Result<()> {
        self.store.loading = true;
        let result = async {
            let jobs = self.backend.fetch_jobs(self.profile_id).await?;
            let candidates = self.backend.fetch_candidates(self.profile_id).await?;
            self.store.replace_all(jobs, candidates);
            Ok(())
        }
        .await;
        self.store.loading = false;
        result
    }

    /// Applies a status transition per the pipeline contract. On a failed
    /// PATCH the speculative local change is discarded by refetching the
    /// authoritative collection; there is no fine-grained rollback.
    pub async fn transition(
        &mut self,
        candidate_id: i64,
        request: TransitionRequest,
    ) -> Result<()> {
        match plan(&request)? {
            TransitionPlan::Optimistic { target } => {
                if !self.store.apply_status(candidate_id, target, None) {
                    anyhow::bail!("candidate {} not in store", candidate_id);
                }
                if let Err(err) = self.backend.patch_status(candidate_id, target, None).await {
                    error!(candidate_id, %err, "status PATCH failed, reconciling");
                    self.reconcile().await;
                    return Err(err);
                }
                Ok(())
            }
            TransitionPlan::Deferred { target, reason } => {
                // Rejected is never shown before the server confirms it.
                self.backend
                    .patch_status(candidate_id, target, Some(reason.clone()))
                    .await?;
                self.store.apply_status(candidate_id, target, Some(reason));
                Ok(())
            }
        }
    }

    /// Network first; the local entry is removed only on success.
    pub async fn delete_candidate(&mut self, candidate_id: i64) -> Result<()> {
        self.backend.delete_candidate(candidate_id).await?;
        self.store.remove_candidate(candidate_id);
        Ok(())
    }

    pub async fn delete_job(&mut self, job_id: i64) -> Result<()> {
        self.backend.delete_job(job_id).await?;
        self.store.remove_job(job_id);
        Ok(())
    }

    /// PATCHes the job without merging locally; callers refetch to observe
    /// the change.
    pub async fn update_job(&mut self, job_id: i64, patch: serde_json::Value) -> Result<()> {
        self.backend.patch_job(job_id, patch).await
    }

    /// Best-effort reconciliation: a failed refetch leaves the stale local
    /// state in place and is only logged.
    async fn reconcile(&mut self) {
        if let Err(err) = self.fetch_all().await {
            warn!(%err, "reconciliation fetch failed, keeping stale local state");
        }
    }
}

/// Production backend speaking to the Domain Services over HTTP; the session
/// embedding equivalent of the browser client.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl PipelineBackend for HttpBackend {
    async fn fetch_jobs(&self, profile_id: i64) -> Result<Vec<JobPosting>> {
        let jobs = self
            .client
            .get(self.url("/api/jobs"))
            .query(&[("owner", profile_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(jobs)
    }

    async fn fetch_candidates(&self, profile_id: i64) -> Result<Vec<Candidate>> {
        let candidates = self
            .client
            .get(self.url("/api/candidates"))
            .query(&[("owner", profile_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(candidates)
    }

    async fn patch_status(
        &self,
        candidate_id: i64,
        status: CandidateStatus,
        reason: Option<String>,
    ) -> Result<()> {
        self.client
            .patch(self.url(&format!("/api/candidates/{}/status", candidate_id)))
            .json(&serde_json::json!({
                "status": status.as_wire(),
                "rejection_reason": reason,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn patch_job(&self, job_id: i64, patch: serde_json::Value) -> Result<()> {
        self.client
            .patch(self.url(&format!("/api/jobs/{}", job_id)))
            .json(&patch)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_job(&self, job_id: i64) -> Result<()> {
        self.client
            .delete(self.url(&format!("/api/jobs/{}", job_id)))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_candidate(&self, candidate_id: i64) -> Result<()> {
        self.client
            .delete(self.url(&format!("/api/candidates/{}", candidate_id)))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
