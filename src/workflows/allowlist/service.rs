use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{AllowlistRecordId, ApprovedApplicant, PhoneChangeAudit};
use super::phone::normalize_phone;
use super::repository::{AllowlistRepository, AllowlistRepositoryError};
use crate::workflows::admissions::notifications::NotificationDispatcher;

/// Service managing the approved-applicant allowlist and its audit trail.
pub struct AllowlistService<R, N> {
    repository: Arc<R>,
    dispatcher: Arc<N>,
}

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_record_id() -> AllowlistRecordId {
    let id = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AllowlistRecordId(format!("alw-{id:06}"))
}

/// Result of an approval call, distinguishing fresh inserts from the
/// idempotent already-approved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneApproval {
    pub record: ApprovedApplicant,
    pub newly_approved: bool,
}

impl<R, N> AllowlistService<R, N>
where
    R: AllowlistRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    pub fn new(repository: Arc<R>, dispatcher: Arc<N>) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Add a phone number to the allowlist.
    ///
    /// Idempotent on the normalized number: if a record already exists the
    /// notes are refreshed and the existing record returned, no duplicate
    /// error. Fresh approvals trigger a best-effort notification.
    pub fn approve_phone(
        &self,
        phone_number: &str,
        approver_id: &str,
        notes: Option<String>,
    ) -> Result<PhoneApproval, AllowlistServiceError> {
        let normalized = normalize_phone(phone_number);

        if let Some(existing) = self.repository.find_by_phone(&normalized)? {
            let record = self.repository.update_notes(&existing.id, notes)?;
            return Ok(PhoneApproval {
                record,
                newly_approved: false,
            });
        }

        let record = self.repository.insert(ApprovedApplicant {
            id: next_record_id(),
            phone_number: normalized.clone(),
            approved_by: approver_id.to_string(),
            approved_at: Utc::now(),
            notes,
        })?;

        if let Err(err) = self.dispatcher.send_allowlist_approval(&normalized) {
            warn!(
                phone = %normalized,
                error = %err,
                "allowlist approval notification failed; record already stored"
            );
        }

        Ok(PhoneApproval {
            record,
            newly_approved: true,
        })
    }

    /// Change an approved record's phone number.
    ///
    /// The audit row is appended before the record update so a crash between
    /// the two writes can only leave a dangling audit entry, never an
    /// unaudited change. A normalized number already held by another record
    /// is a hard [`AllowlistRepositoryError::DuplicatePhone`].
    pub fn change_approved_phone(
        &self,
        record_id: &AllowlistRecordId,
        new_phone_number: &str,
        reason: &str,
        actor_id: &str,
    ) -> Result<ApprovedApplicant, AllowlistServiceError> {
        let record = self
            .repository
            .get(record_id)?
            .ok_or(AllowlistRepositoryError::NotFound)?;

        let normalized = normalize_phone(new_phone_number);

        if let Some(holder) = self.repository.find_by_phone(&normalized)? {
            if holder.id != record.id {
                return Err(AllowlistRepositoryError::DuplicatePhone.into());
            }
        }

        self.repository.append_audit(PhoneChangeAudit {
            record_id: record.id.clone(),
            old_phone_number: record.phone_number.clone(),
            new_phone_number: normalized.clone(),
            changed_by: actor_id.to_string(),
            reason: reason.to_string(),
            changed_at: Utc::now(),
        })?;

        let updated = self.repository.update_phone(&record.id, &normalized)?;
        Ok(updated)
    }

    /// Read back the append-only change trail for a record.
    pub fn audit_history(
        &self,
        record_id: &AllowlistRecordId,
    ) -> Result<Vec<PhoneChangeAudit>, AllowlistServiceError> {
        Ok(self.repository.audit_history(record_id)?)
    }
}

/// Error raised by the allowlist service.
#[derive(Debug, thiserror::Error)]
pub enum AllowlistServiceError {
    #[error(transparent)]
    Repository(#[from] AllowlistRepositoryError),
}
