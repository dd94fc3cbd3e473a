pub mod behavioral;
pub mod calendar;
pub mod candidate;
pub mod job;
pub mod theoretical;
pub mod user;
