use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, ReviewStage, StageReview,
};

/// Stamped, ready-to-persist result of a successful transition. Applied as
/// a single conditional write keyed by the status observed at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationUpdate {
    pub status: ApplicationStatus,
    pub stage_review: Option<(ReviewStage, StageReview)>,
    pub sector: Option<String>,
    pub rejection_reason: Option<String>,
}

impl ApplicationUpdate {
    /// Fold the update into a loaded snapshot. Shared by store adapters so
    /// they agree on what a patch means.
    pub fn apply_to(&self, application: &mut Application) {
        application.status = self.status;
        if let Some((stage, review)) = &self.stage_review {
            application.set_stage_review(*stage, review.clone());
        }
        if let Some(sector) = &self.sector {
            application.sector = Some(sector.clone());
        }
        if let Some(reason) = &self.rejection_reason {
            application.rejection_reason = Some(reason.clone());
        }
    }
}

/// Storage abstraction over the application entity store.
///
/// `conditional_update` is the optimistic-concurrency primitive: the write
/// applies only if the row still carries `expected_status`, otherwise the
/// store reports [`RepositoryError::ConcurrentModification`] and the caller
/// reloads and retries.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn load(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn conditional_update(
        &self,
        id: &ApplicationId,
        expected_status: ApplicationStatus,
        update: &ApplicationUpdate,
    ) -> Result<Application, RepositoryError>;
}

/// Error enumeration for entity-store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record changed since it was loaded")]
    ConcurrentModification,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of an application's exposed workflow state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub full_name: String,
    pub status: String,
    pub admission_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl ApplicationStatusView {
    pub fn from_application(application: &Application) -> Self {
        Self {
            application_id: application.id.clone(),
            full_name: application.full_name.clone(),
            status: application.status.label().to_string(),
            admission_level: application.admission_level.label().to_string(),
            sector: application.sector.clone(),
            rejection_reason: application.rejection_reason.clone(),
        }
    }
}
