use serde::{Deserialize, Serialize};

use super::domain::ApplicationStatus;

/// Trait describing the outbound SMS/e-mail gateway hook.
///
/// Dispatch is best-effort everywhere it is called: a failure is logged and
/// surfaced as a flag, never allowed to roll back or mask a committed state
/// transition.
pub trait NotificationDispatcher: Send + Sync {
    fn send_status_notification(
        &self,
        phone: &str,
        recipient_name: &str,
        status: ApplicationStatus,
    ) -> Result<(), DispatchError>;

    /// "You are approved to apply" message for the phone allowlist flow.
    fn send_allowlist_approval(&self, phone: &str) -> Result<(), DispatchError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Whether the post-transition notification left the building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    Delivered,
    Failed,
}

/// Fixed status-to-message template table, keyed by every status value.
pub fn status_message(status: ApplicationStatus, recipient_name: &str) -> String {
    match status {
        ApplicationStatus::Draft => format!(
            "Hello {recipient_name}, your ministerial application draft has been saved. \
             Submit it when you are ready."
        ),
        ApplicationStatus::Submitted => format!(
            "Hello {recipient_name}, your ministerial application has been received \
             and is awaiting local screening."
        ),
        ApplicationStatus::LocalScreening => format!(
            "Hello {recipient_name}, your application has passed local screening \
             and moved to association review."
        ),
        ApplicationStatus::AssociationApproved => format!(
            "Hello {recipient_name}, your application has been approved by your \
             association and forwarded to the VP office."
        ),
        ApplicationStatus::VpReview => format!(
            "Hello {recipient_name}, your application is under final review by the \
             VP office."
        ),
        ApplicationStatus::Approved => format!(
            "Congratulations {recipient_name}, your ministerial application has been \
             approved. Your admission letter will follow shortly."
        ),
        ApplicationStatus::Rejected => format!(
            "Hello {recipient_name}, your ministerial application was not successful \
             at this time. Please contact your local office for details."
        ),
    }
}

/// Message sent when a phone number is added to the applicant allowlist.
pub fn allowlist_approval_message() -> &'static str {
    "Your phone number has been approved. You may now begin your ministerial \
     application."
}
