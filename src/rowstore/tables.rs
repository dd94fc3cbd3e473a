//! Fixed numeric table identifiers in the hosted row store.
//!
//! All durable entities live in these tables; there is no local database.

pub const USERS: i64 = 551;
pub const JOBS: i64 = 552;
pub const CANDIDATES: i64 = 553;
pub const BEHAVIORAL_RESULTS: i64 = 554;
pub const THEORETICAL_MODELS: i64 = 555;
pub const APPLIED_TESTS: i64 = 556;
