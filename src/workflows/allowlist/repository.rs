use super::domain::{AllowlistRecordId, ApprovedApplicant, PhoneChangeAudit};

/// Storage abstraction over the allowlist and its audit trail.
///
/// `append_audit` must be durable before the subsequent `update_phone` is
/// attempted: a crash between the two leaves an audit row without a change,
/// never a change without its audit row.
pub trait AllowlistRepository: Send + Sync {
    fn insert(&self, record: ApprovedApplicant)
        -> Result<ApprovedApplicant, AllowlistRepositoryError>;
    fn get(
        &self,
        id: &AllowlistRecordId,
    ) -> Result<Option<ApprovedApplicant>, AllowlistRepositoryError>;
    /// Lookup by normalized phone number (the allowlist's unique key).
    fn find_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<ApprovedApplicant>, AllowlistRepositoryError>;
    fn update_notes(
        &self,
        id: &AllowlistRecordId,
        notes: Option<String>,
    ) -> Result<ApprovedApplicant, AllowlistRepositoryError>;
    fn update_phone(
        &self,
        id: &AllowlistRecordId,
        phone_number: &str,
    ) -> Result<ApprovedApplicant, AllowlistRepositoryError>;
    fn append_audit(&self, audit: PhoneChangeAudit) -> Result<(), AllowlistRepositoryError>;
    fn audit_history(
        &self,
        id: &AllowlistRecordId,
    ) -> Result<Vec<PhoneChangeAudit>, AllowlistRepositoryError>;
}

/// Error enumeration for allowlist storage failures.
#[derive(Debug, thiserror::Error)]
pub enum AllowlistRepositoryError {
    #[error("allowlist record not found")]
    NotFound,
    #[error("another allowlist record already holds this phone number")]
    DuplicatePhone,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
