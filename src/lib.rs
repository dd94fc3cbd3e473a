pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod rowstore;
pub mod services;
pub mod utils;

use crate::rowstore::RowStoreClient;
use crate::services::{
    automatch_service::AutoMatchService, behavioral_service::BehavioralService,
    calendar_service::CalendarService, candidate_service::CandidateService,
    job_service::JobService, message_service::MessageService,
    theoretical_service::TheoreticalService, user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub rowstore: RowStoreClient,
    pub job_service: JobService,
    pub candidate_service: CandidateService,
    pub user_service: UserService,
    pub calendar_service: CalendarService,
    pub automatch_service: AutoMatchService,
    pub message_service: MessageService,
    pub behavioral_service: BehavioralService,
    pub theoretical_service: TheoreticalService,
}

impl AppState {
    pub fn new() -> Self {
        let config = crate::config::get_config();
        Self::with_rowstore(RowStoreClient::new(
            config.rowstore_base_url.clone(),
            config.rowstore_api_token.clone(),
        ))
    }

    /// Builds the state around an explicit row store client; tests point
    /// this at a local fake.
    pub fn with_rowstore(rowstore: RowStoreClient) -> Self {
        let config = crate::config::get_config();

        let job_service = JobService::new(rowstore.clone());
        let candidate_service = CandidateService::new(rowstore.clone());
        let user_service = UserService::new(rowstore.clone());
        let calendar_service = CalendarService::new(
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
            config.google_redirect_uri.clone(),
        );
        let automatch_service = AutoMatchService::new(config.auto_match_url.clone());
        let message_service = MessageService::new();
        let behavioral_service = BehavioralService::new(
            rowstore.clone(),
            config.behavioral_webhook_url.clone(),
            config.webhook_secret.clone(),
        );
        let theoretical_service = TheoreticalService::new(rowstore.clone());

        Self {
            rowstore,
            job_service,
            candidate_service,
            user_service,
            calendar_service,
            automatch_service,
            message_service,
            behavioral_service,
            theoretical_service,
        }
    }
}
