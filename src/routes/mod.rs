use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod auth;
pub mod automatch;
pub mod behavioral;
pub mod calendar;
pub mod candidates;
pub mod health;
pub mod jobs;
pub mod messages;
pub mod theoretical;
pub mod users;

/// Assembles the full application router: the recruiter-facing integration
/// surface and the unauthenticated public test-link surface, each behind its
/// own rate limit.
pub fn app(state: AppState) -> Router {
    let config = crate::config::get_config();

    let base_routes = Router::new().route("/health", get(health::health));

    let integration_api = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/users/:id", get(users::get_profile))
        .route("/api/users/:id/profile", patch(users::update_profile))
        .route("/api/users/:id/password", patch(users::update_password))
        .route("/api/upload-avatar", post(users::upload_avatar))
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/api/jobs/:id",
            get(jobs::get_job)
                .patch(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route("/api/jobs/:id/board", get(jobs::job_board))
        .route(
            "/api/candidates",
            get(candidates::list_candidates).post(candidates::create_candidate),
        )
        .route("/api/candidates/search", post(candidates::search_candidates))
        .route(
            "/api/candidates/:id",
            get(candidates::get_candidate)
                .patch(candidates::update_candidate)
                .delete(candidates::delete_candidate),
        )
        .route("/api/candidates/:id/status", patch(candidates::update_status))
        .route(
            "/api/candidates/:id/contact-date",
            patch(candidates::update_contact_date),
        )
        .route("/api/candidates/:id/video", post(candidates::upload_video))
        .route("/api/candidates/:id/whatsapp", get(messages::whatsapp_link))
        .route("/api/auto-match/execute", post(automatch::execute))
        .route("/api/google/calendar/auth-url", get(calendar::auth_url))
        .route("/api/google/calendar/oauth/callback", get(calendar::oauth_callback))
        .route(
            "/api/google/calendar/events",
            get(calendar::list_events).post(calendar::create_event),
        )
        .route(
            "/api/google/calendar/events/:event_id",
            axum::routing::put(calendar::update_event).delete(calendar::delete_event),
        )
        .route("/api/behavioral-test/links", post(behavioral::create_link))
        .route(
            "/api/theoretical-test/models",
            get(theoretical::list_models).post(theoretical::create_model),
        )
        .route(
            "/api/theoretical-test/models/:id",
            patch(theoretical::set_model_active),
        )
        .route("/api/theoretical-test/apply", post(theoretical::apply))
        .layer(axum::middleware::from_fn_with_state(
            crate::middleware::rate_limit::new_rps_state(config.integration_rps),
            crate::middleware::rate_limit::rps_middleware,
        ));

    let public_api = Router::new()
        .route("/api/behavioral-test/:token", get(behavioral::get_by_token))
        .route("/api/behavioral-test/:token/submit", post(behavioral::submit))
        .route("/api/behavioral-test/webhook/complete", post(behavioral::complete))
        .route("/api/theoretical-test/:token", get(theoretical::get_by_token))
        .route(
            "/api/theoretical-test/:token/answer",
            patch(theoretical::save_answer),
        )
        .route("/api/theoretical-test/:token/submit", post(theoretical::submit))
        .layer(axum::middleware::from_fn_with_state(
            crate::middleware::rate_limit::new_rps_state(config.public_rps),
            crate::middleware::rate_limit::rps_middleware,
        ));

    base_routes
        .merge(integration_api)
        .merge(public_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Interview videos: 100MB per multipart body.
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
}
