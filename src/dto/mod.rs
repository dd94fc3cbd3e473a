pub mod auth_dto;
pub mod calendar_dto;
pub mod candidate_dto;
pub mod job_dto;
pub mod test_dto;
pub mod user_dto;
