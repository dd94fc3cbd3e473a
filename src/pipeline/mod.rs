//! Candidate pipeline core: the ordered status state machine, the kanban and
//! table projections over one shared candidate collection, the talent-database
//! filters, and the optimistic-update/reconciliation session contract.

pub mod board;
pub mod filter;
pub mod sort;
pub mod status;
pub mod store;
pub mod transition;

pub use status::CandidateStatus;
