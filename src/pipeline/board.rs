use crate::models::candidate::Candidate;
use crate::pipeline::status::{CandidateStatus, ALL_STATUSES};
use serde::Serialize;

/// One kanban column: the status and the candidates assigned to it.
#[derive(Debug, Clone, Serialize)]
pub struct KanbanColumn {
    pub status: CandidateStatus,
    pub candidates: Vec<Candidate>,
}

/// Column membership: a candidate belongs to column S iff its status equals
/// S, or S is the initial state and the candidate has no status at all.
pub fn column_of(candidate: &Candidate) -> CandidateStatus {
    candidate.effective_status()
}

/// Projects the shared candidate collection into columns in canonical order.
/// Every candidate lands in exactly one column; none is ever dropped.
pub fn build_board(candidates: &[Candidate]) -> Vec<KanbanColumn> {
    ALL_STATUSES
        .iter()
        .map(|status| KanbanColumn {
            status: *status,
            candidates: candidates
                .iter()
                .filter(|c| column_of(c) == *status)
                .cloned()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, status: Option<CandidateStatus>) -> Candidate {
        Candidate {
            id,
            name: format!("Candidate {}", id),
            email: None,
            phone: None,
            score: None,
            status,
            job_ids: vec![],
            video_interview: None,
            last_contact: None,
            ai_summary: None,
            profile: Default::default(),
            behavioral_test_status: None,
            theoretical_test_status: None,
            sex: None,
            education_level: None,
            age: None,
            city: None,
            neighborhood: None,
            rejection_reason: None,
            interview_notes: None,
            created_at: None,
        }
    }

    #[test]
    fn statusless_candidates_land_in_the_screening_column() {
        let list = vec![candidate(1, None), candidate(2, Some(CandidateStatus::Hired))];
        let board = build_board(&list);
        assert_eq!(board[0].status, CandidateStatus::Screening);
        assert_eq!(board[0].candidates.len(), 1);
        assert_eq!(board[0].candidates[0].id, 1);
    }

    #[test]
    fn every_candidate_appears_in_exactly_one_column() {
        let list = vec![
            candidate(1, None),
            candidate(2, Some(CandidateStatus::PracticalTest)),
            candidate(3, Some(CandidateStatus::Rejected)),
            candidate(4, Some(CandidateStatus::Screening)),
        ];
        let board = build_board(&list);
        let total: usize = board.iter().map(|c| c.candidates.len()).sum();
        assert_eq!(total, list.len());
    }

    #[test]
    fn columns_follow_canonical_pipeline_order() {
        let board = build_board(&[]);
        let order: Vec<_> = board.iter().map(|c| c.status).collect();
        assert_eq!(order, ALL_STATUSES.to_vec());
    }
}
