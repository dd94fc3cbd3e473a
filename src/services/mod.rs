pub mod automatch_service;
pub mod behavioral_service;
pub mod calendar_service;
pub mod candidate_service;
pub mod job_service;
pub mod message_service;
pub mod theoretical_service;
pub mod user_service;
