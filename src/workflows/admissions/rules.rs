use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationStatus, ReviewStage, ReviewerRole};

/// Action requested against an application under review.
///
/// `Force` is the super-admin correction path: it bypasses the transition
/// table entirely and is refused for every other role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "target")]
pub enum ReviewAction {
    Approve,
    Reject,
    Force(ApplicationStatus),
}

/// Closed payload accompanying a review submission. Which fields matter
/// depends on the row of the transition table being exercised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewPayload {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

/// Pure validation failures from the transition table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("role {} has no transition defined from status {}", .role.label(), .status.label())]
    InvalidRoleForState {
        role: ReviewerRole,
        status: ApplicationStatus,
    },
    #[error("required field missing or empty: {field}")]
    MissingRequiredField { field: &'static str },
}

/// Deterministic result of a legal transition. The controller stamps the
/// named stage with the acting reviewer and the commit time; the engine
/// itself never touches a clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPatch {
    pub status: ApplicationStatus,
    /// Stage whose audit triple must be written alongside this transition.
    pub stage: Option<ReviewStage>,
    pub notes: Option<String>,
    pub sector: Option<String>,
    pub rejection_reason: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

/// Decide whether `role` may apply `action` to the application in its
/// current status, and what the resulting patch is.
///
/// Pure function over its inputs: no side effects, no clock, no store, so
/// the whole transition table is unit-testable in isolation. Terminal
/// applications and wrong-stage attempts both surface as
/// [`TransitionError::InvalidRoleForState`], since neither role holds a row
/// for that status.
pub fn evaluate_transition(
    application: &Application,
    role: ReviewerRole,
    action: &ReviewAction,
    payload: &ReviewPayload,
) -> Result<TransitionPatch, TransitionError> {
    let status = application.status;

    if let ReviewAction::Force(target) = action {
        if role != ReviewerRole::SuperAdmin {
            return Err(TransitionError::InvalidRoleForState { role, status });
        }
        return Ok(TransitionPatch {
            status: *target,
            stage: None,
            notes: non_blank(&payload.notes).map(str::to_string),
            sector: non_blank(&payload.sector).map(str::to_string),
            rejection_reason: non_blank(&payload.rejection_reason).map(str::to_string),
        });
    }

    // Which stage this role reviews at, and where an approval lands next.
    let (stage, next_status) = match (role, status) {
        (ReviewerRole::LocalOfficer, ApplicationStatus::Submitted) => {
            (ReviewStage::Local, ApplicationStatus::LocalScreening)
        }
        (ReviewerRole::AssociationHead, ApplicationStatus::LocalScreening) => (
            ReviewStage::Association,
            ApplicationStatus::AssociationApproved,
        ),
        (ReviewerRole::VpOffice, ApplicationStatus::AssociationApproved) => {
            (ReviewStage::Vp, ApplicationStatus::VpReview)
        }
        (ReviewerRole::VpOffice, ApplicationStatus::VpReview) => {
            // Final VP pass: the vp triple was stamped on entry to VpReview,
            // so this row finalizes (or rejects) without re-stamping it.
            return match action {
                ReviewAction::Approve => Ok(TransitionPatch {
                    status: ApplicationStatus::Approved,
                    stage: None,
                    notes: None,
                    sector: None,
                    rejection_reason: None,
                }),
                ReviewAction::Reject => {
                    let reason = non_blank(&payload.rejection_reason).ok_or(
                        TransitionError::MissingRequiredField {
                            field: "rejection_reason",
                        },
                    )?;
                    Ok(TransitionPatch {
                        status: ApplicationStatus::Rejected,
                        stage: None,
                        notes: None,
                        sector: None,
                        rejection_reason: Some(reason.to_string()),
                    })
                }
                ReviewAction::Force(_) => unreachable!("force handled above"),
            };
        }
        _ => return Err(TransitionError::InvalidRoleForState { role, status }),
    };

    match action {
        ReviewAction::Approve => {
            let mut sector = None;
            if stage == ReviewStage::Vp {
                // VP approval out of association_approved requires a sector,
                // either already on the record or supplied in this call.
                let supplied = non_blank(&payload.sector);
                let existing = application
                    .sector
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty());
                match (supplied, existing) {
                    (Some(value), _) => sector = Some(value.to_string()),
                    (None, Some(_)) => {}
                    (None, None) => {
                        return Err(TransitionError::MissingRequiredField { field: "sector" })
                    }
                }
            }

            Ok(TransitionPatch {
                status: next_status,
                stage: Some(stage),
                notes: non_blank(&payload.notes).map(str::to_string),
                sector,
                rejection_reason: None,
            })
        }
        ReviewAction::Reject => {
            let reason =
                non_blank(&payload.rejection_reason).ok_or(TransitionError::MissingRequiredField {
                    field: "rejection_reason",
                })?;
            Ok(TransitionPatch {
                status: ApplicationStatus::Rejected,
                stage: Some(stage),
                notes: None,
                sector: None,
                rejection_reason: Some(reason.to_string()),
            })
        }
        ReviewAction::Force(_) => unreachable!("force handled above"),
    }
}
