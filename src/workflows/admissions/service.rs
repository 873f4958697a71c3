use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{Application, ApplicationId, ApplicationIntake, ApplicationStatus, ReviewerRole, StageReview};
use super::notifications::{DispatchOutcome, NotificationDispatcher};
use super::repository::{ApplicationRepository, ApplicationUpdate, RepositoryError};
use super::rules::{evaluate_transition, ReviewAction, ReviewPayload, TransitionError};

/// Controller sequencing the effectful steps around a review transition:
/// load, evaluate, conditional persist, best-effort notify.
pub struct ReviewService<R, N> {
    repository: Arc<R>,
    dispatcher: Arc<N>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("adm-{id:06}"))
}

/// Updated snapshot plus the fate of the outbound notification.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub application: Application,
    pub dispatch: DispatchOutcome,
}

impl<R, N> ReviewService<R, N>
where
    R: ApplicationRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    pub fn new(repository: Arc<R>, dispatcher: Arc<N>) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Create an application from an intake payload, landing it in
    /// `Submitted` with the submission time stamped.
    pub fn submit(&self, intake: ApplicationIntake) -> Result<Application, ReviewServiceError> {
        let application = Application {
            id: next_application_id(),
            full_name: intake.full_name,
            email: intake.email,
            phone: intake.phone,
            date_of_birth: intake.date_of_birth,
            marital_status: intake.marital_status,
            photo_reference: intake.photo_reference,
            admission_level: intake.admission_level,
            church_name: intake.church_name,
            fellowship: intake.fellowship,
            association: intake.association,
            sector: None,
            status: ApplicationStatus::Submitted,
            submitted_at: Some(Utc::now()),
            local_review: None,
            association_review: None,
            vp_review: None,
            rejection_reason: None,
        };

        let stored = self.repository.insert(application)?;
        Ok(stored)
    }

    /// Apply one review transition.
    ///
    /// Rules-engine failures propagate verbatim; they are caller errors and
    /// never retried here. [`RepositoryError::ConcurrentModification`] is
    /// the only retryable outcome, after the caller reloads. Notification
    /// dispatch happens strictly after the commit and its failure is
    /// reported as a flag, not an error.
    pub fn submit_review(
        &self,
        application_id: &ApplicationId,
        actor_role: ReviewerRole,
        actor_id: &str,
        action: &ReviewAction,
        payload: &ReviewPayload,
    ) -> Result<ReviewOutcome, ReviewServiceError> {
        let application = self
            .repository
            .load(application_id)?
            .ok_or(RepositoryError::NotFound)?;

        let patch = evaluate_transition(&application, actor_role, action, payload)?;

        let stage_review = patch.stage.map(|stage| {
            (
                stage,
                StageReview {
                    reviewer_id: actor_id.to_string(),
                    reviewed_at: Utc::now(),
                    notes: patch.notes.clone(),
                },
            )
        });
        let update = ApplicationUpdate {
            status: patch.status,
            stage_review,
            sector: patch.sector,
            rejection_reason: patch.rejection_reason,
        };

        let updated =
            self.repository
                .conditional_update(application_id, application.status, &update)?;

        let dispatch = match self.dispatcher.send_status_notification(
            &updated.phone,
            &updated.full_name,
            updated.status,
        ) {
            Ok(()) => DispatchOutcome::Delivered,
            Err(err) => {
                warn!(
                    application_id = %updated.id.0,
                    status = updated.status.label(),
                    error = %err,
                    "status notification failed; transition already committed"
                );
                DispatchOutcome::Failed
            }
        };

        Ok(ReviewOutcome {
            application: updated,
            dispatch,
        })
    }

    /// Fetch an application for API status views.
    pub fn get(&self, application_id: &ApplicationId) -> Result<Application, ReviewServiceError> {
        let application = self
            .repository
            .load(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }
}

/// Error raised by the review workflow controller.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
