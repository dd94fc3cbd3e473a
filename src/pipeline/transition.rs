use crate::pipeline::status::CandidateStatus;

/// A requested status change, from drag-and-drop or the status dropdown.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub target: CandidateStatus,
    pub reason: Option<String>,
}

/// How the change is applied to the local collection relative to the PATCH.
///
/// Any state may move to any other state; there is no adjacency rule. The
/// one intercepted transition is entering Rejected, which must carry a
/// non-empty reason and is only applied locally after the server confirms.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionPlan {
    /// Apply to the local store immediately, confirm with an async PATCH.
    Optimistic { target: CandidateStatus },
    /// Send first; apply locally only on success. Used for Rejected so a
    /// failed persistence call never leaves the board showing Rejected.
    Deferred {
        target: CandidateStatus,
        reason: String,
    },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TransitionError {
    #[error("A rejection reason is required to move a candidate to Rejected")]
    MissingRejectionReason,
}

pub fn plan(request: &TransitionRequest) -> Result<TransitionPlan, TransitionError> {
    if request.target == CandidateStatus::Rejected {
        let reason = request
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(TransitionError::MissingRejectionReason)?;
        return Ok(TransitionPlan::Deferred {
            target: CandidateStatus::Rejected,
            reason: reason.to_string(),
        });
    }
    Ok(TransitionPlan::Optimistic {
        target: request.target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_non_rejected_target_is_optimistic() {
        for target in crate::pipeline::status::ALL_STATUSES {
            if target == CandidateStatus::Rejected {
                continue;
            }
            let plan = plan(&TransitionRequest {
                target,
                reason: None,
            })
            .unwrap();
            assert_eq!(plan, TransitionPlan::Optimistic { target });
        }
    }

    #[test]
    fn rejected_without_reason_is_refused() {
        let request = TransitionRequest {
            target: CandidateStatus::Rejected,
            reason: None,
        };
        assert_eq!(
            plan(&request).unwrap_err(),
            TransitionError::MissingRejectionReason
        );

        let blank = TransitionRequest {
            target: CandidateStatus::Rejected,
            reason: Some("   ".to_string()),
        };
        assert_eq!(
            plan(&blank).unwrap_err(),
            TransitionError::MissingRejectionReason
        );
    }

    #[test]
    fn rejected_with_reason_is_deferred() {
        let request = TransitionRequest {
            target: CandidateStatus::Rejected,
            reason: Some("  Perfil fora do escopo  ".to_string()),
        };
        assert_eq!(
            plan(&request).unwrap(),
            TransitionPlan::Deferred {
                target: CandidateStatus::Rejected,
                reason: "Perfil fora do escopo".to_string(),
            }
        );
    }
}
